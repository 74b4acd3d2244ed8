use std::future::Future;
use std::pin::Pin;

use crate::dataset::{Element, ElementState};
use crate::render::Snapshot;

use super::{Flow, Stepper};

pub const LISTING: &str = "\
procedure quickSort(arr, low, high)
  if low < high
    p <- partition(arr, low, high)
    quickSort(arr, low, p - 1)
    quickSort(arr, p + 1, high)

procedure partition(arr, low, high)
  pivot <- arr[high]
  i <- low - 1
  for j <- low to high - 1
    if arr[j] < pivot
      i <- i + 1
      swap arr[i], arr[j]
  swap arr[i + 1], arr[high]
  return i + 1";

pub mod line {
    use crate::signal::LineId;

    pub const PIVOT: LineId = LineId::new(8);
    pub const COMPARE: LineId = LineId::new(11);
    pub const SWAP: LineId = LineId::new(13);
    pub const PLACE_PIVOT: LineId = LineId::new(14);

    pub const ALL: [LineId; 4] = [PIVOT, COMPARE, SWAP, PLACE_PIVOT];
}

pub(crate) async fn run(elements: &mut [Element], stepper: &mut Stepper<'_>) -> Flow {
    match elements.len() {
        0 => Ok(()),
        len => sort_range(elements, 0, len - 1, stepper).await,
    }
}

type StepFuture<'a> = Pin<Box<dyn Future<Output = Flow> + 'a>>;

/// Lomuto quicksort over the inclusive range `start..=end`, pivot at `end`.
/// The left partition is finished before the right one is started.
fn sort_range<'a>(
    elements: &'a mut [Element],
    start: usize,
    end: usize,
    stepper: &'a mut Stepper<'_>,
) -> StepFuture<'a> {
    Box::pin(async move {
        if start >= end {
            return Ok(());
        }

        let pivot_value = elements[end].value;
        elements[end].state = ElementState::Pivot;
        stepper.step(Snapshot::Bars(elements), line::PIVOT).await?;

        // next slot of the "less than pivot" prefix
        let mut store = start;
        for j in start..end {
            elements[j].state = ElementState::Comparing;
            stepper.step(Snapshot::Bars(elements), line::COMPARE).await?;

            let compared = if elements[j].value < pivot_value {
                elements.swap(store, j);
                store += 1;
                stepper.step(Snapshot::Bars(elements), line::SWAP).await?;
                store - 1
            } else {
                j
            };
            elements[compared].state = ElementState::Default;
        }

        elements.swap(store, end);
        elements[store].state = ElementState::Sorted;
        stepper.step(Snapshot::Bars(elements), line::PLACE_PIVOT).await?;

        if store > start {
            sort_range(elements, start, store - 1, stepper).await?;
        }
        sort_range(elements, store + 1, end, stepper).await
    })
}
