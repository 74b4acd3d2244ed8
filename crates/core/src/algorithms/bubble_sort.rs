use crate::dataset::{Element, ElementState};
use crate::render::Snapshot;

use super::{Flow, Stepper};

pub const LISTING: &str = "\
procedure bubbleSort(arr)
  n <- length(arr)
  repeat
    swapped <- false
    for i <- 0 to n - 2
      if arr[i] > arr[i + 1]
        temp <- arr[i]
        arr[i] <- arr[i + 1]
        arr[i + 1] <- temp
        swapped <- true
    n <- n - 1
  until not swapped
  return arr";

pub mod line {
    use crate::signal::LineId;

    pub const COMPARE: LineId = LineId::new(6);
    pub const TEMP: LineId = LineId::new(7);
    pub const ASSIGN_LEFT: LineId = LineId::new(8);
    pub const ASSIGN_RIGHT: LineId = LineId::new(9);
    pub const SWAPPED: LineId = LineId::new(10);
    pub const SHRINK: LineId = LineId::new(11);
    pub const UNTIL: LineId = LineId::new(12);

    pub const ALL: [LineId; 7] = [COMPARE, TEMP, ASSIGN_LEFT, ASSIGN_RIGHT, SWAPPED, SHRINK, UNTIL];
}

fn tag_pair(elements: &mut [Element], i: usize, state: ElementState) {
    elements[i].state = state;
    elements[i + 1].state = state;
}

/// Optimised bubble sort with the early-exit flag. The swap itself lands on
/// the assign-left step so every rendered frame is a permutation of the input.
pub(crate) async fn run(elements: &mut [Element], stepper: &mut Stepper<'_>) -> Flow {
    let mut n = elements.len();

    loop {
        let mut swapped = false;

        for i in 0..n.saturating_sub(1) {
            tag_pair(elements, i, ElementState::Comparing);
            stepper.step(Snapshot::Bars(elements), line::COMPARE).await?;

            if elements[i].value > elements[i + 1].value {
                tag_pair(elements, i, ElementState::Swapping);
                stepper.step(Snapshot::Bars(elements), line::TEMP).await?;

                elements.swap(i, i + 1);
                stepper.step(Snapshot::Bars(elements), line::ASSIGN_LEFT).await?;
                stepper.step(Snapshot::Bars(elements), line::ASSIGN_RIGHT).await?;

                swapped = true;
                stepper.step(Snapshot::Bars(elements), line::SWAPPED).await?;
            }

            tag_pair(elements, i, ElementState::Default);
        }

        if n == 0 {
            return Ok(());
        }

        elements[n - 1].state = ElementState::Sorted;
        n -= 1;
        stepper.step(Snapshot::Bars(elements), line::SHRINK).await?;

        if !swapped {
            for element in &mut elements[..n] {
                element.state = ElementState::Sorted;
            }
            return stepper.step(Snapshot::Bars(elements), line::UNTIL).await;
        }
    }
}
