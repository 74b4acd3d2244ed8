//! The four animated algorithms and the step primitive they share.
//!
//! Every algorithm is written as plain (async) control flow over the dataset.
//! Each semantically distinct point calls [`Stepper::step`], which renders,
//! emits the listing line and suspends. A cancelled suspension surfaces as
//! [`Halt::Cancelled`] and unwinds every level through `?`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dataset::{build_fixed_tree, generate_array, Dataset, ValueSource};
use crate::render::{Canvas, Frame, RenderTarget, Snapshot};
use crate::signal::{LineId, StepEmitter};
use crate::timeline::{RunFlag, Suspension};
use crate::VisualiserError;

pub mod breadth_first;
pub mod bubble_sort;
pub mod depth_first;
pub mod quick_sort;

/// Why a run stopped before its algorithm finished.
#[derive(Debug)]
pub(crate) enum Halt {
    Cancelled,
    Failed(VisualiserError),
}

impl From<VisualiserError> for Halt {
    fn from(error: VisualiserError) -> Self {
        Halt::Failed(error)
    }
}

pub(crate) type Flow = std::result::Result<(), Halt>;

/// Performs steps on behalf of a running algorithm.
pub(crate) struct Stepper<'r> {
    run: &'r RunFlag,
    emitter: &'r StepEmitter,
    target: &'r mut dyn RenderTarget,
    canvas: Canvas,
    delay: Duration,
    steps: u64,
}

impl<'r> Stepper<'r> {
    pub(crate) fn new(
        run: &'r RunFlag,
        emitter: &'r StepEmitter,
        target: &'r mut dyn RenderTarget,
        canvas: Canvas,
        delay: Duration,
    ) -> Self {
        Self {
            run,
            emitter,
            target,
            canvas,
            delay,
            steps: 0,
        }
    }

    pub(crate) fn steps(&self) -> u64 {
        self.steps
    }

    /// Renders `snapshot`, emits `line` and waits out the step delay. The
    /// caller has already applied the step's mutation.
    pub(crate) async fn step(&mut self, snapshot: Snapshot<'_>, line: LineId) -> Flow {
        if !self.run.is_running() {
            return Err(Halt::Cancelled);
        }

        self.steps += 1;
        self.target.present(&Frame {
            snapshot,
            canvas: self.canvas,
            step: self.steps,
        })?;
        self.emitter.emit(line);

        match self.run.suspend(self.delay).await {
            Suspension::Elapsed => Ok(()),
            Suspension::Cancelled => Err(Halt::Cancelled),
        }
    }
}

/// The fixed registry of animated algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    BubbleSort,
    QuickSort,
    #[serde(rename = "bfs")]
    BreadthFirstSearch,
    #[serde(rename = "dfs")]
    DepthFirstSearch,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::BubbleSort,
        AlgorithmKind::QuickSort,
        AlgorithmKind::BreadthFirstSearch,
        AlgorithmKind::DepthFirstSearch,
    ];

    /// Registry key used by the presentation layer.
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::BubbleSort => "bubblesort",
            AlgorithmKind::QuickSort => "quicksort",
            AlgorithmKind::BreadthFirstSearch => "bfs",
            AlgorithmKind::DepthFirstSearch => "dfs",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AlgorithmKind::BubbleSort => "Bubble Sort",
            AlgorithmKind::QuickSort => "Quicksort",
            AlgorithmKind::BreadthFirstSearch => "Breadth First Search",
            AlgorithmKind::DepthFirstSearch => "Depth First Search",
        }
    }

    /// Pseudocode shown next to the animation. Line ids emitted by the
    /// algorithm are 1-based line numbers of this text.
    pub fn listing(self) -> &'static str {
        match self {
            AlgorithmKind::BubbleSort => bubble_sort::LISTING,
            AlgorithmKind::QuickSort => quick_sort::LISTING,
            AlgorithmKind::BreadthFirstSearch => breadth_first::LISTING,
            AlgorithmKind::DepthFirstSearch => depth_first::LISTING,
        }
    }

    pub fn is_sort(self) -> bool {
        matches!(self, AlgorithmKind::BubbleSort | AlgorithmKind::QuickSort)
    }

    /// Builds the dataset a fresh run of this algorithm animates.
    pub fn create_dataset(self, array_size: usize, values: &mut dyn ValueSource) -> Dataset {
        if self.is_sort() {
            Dataset::Array(generate_array(array_size, values))
        } else {
            Dataset::Tree(build_fixed_tree())
        }
    }

    pub(crate) async fn execute(self, dataset: &mut Dataset, stepper: &mut Stepper<'_>) -> Flow {
        match (self, dataset) {
            (AlgorithmKind::BubbleSort, Dataset::Array(elements)) => {
                bubble_sort::run(elements, stepper).await
            }
            (AlgorithmKind::QuickSort, Dataset::Array(elements)) => {
                quick_sort::run(elements, stepper).await
            }
            (AlgorithmKind::BreadthFirstSearch, Dataset::Tree(root)) => {
                breadth_first::run(root, stepper).await
            }
            (AlgorithmKind::DepthFirstSearch, Dataset::Tree(root)) => {
                depth_first::run(root, stepper).await
            }
            (kind, _) => Err(Halt::Failed(VisualiserError::msg(format!(
                "dataset does not match `{}`",
                kind.name()
            )))),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = VisualiserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VisualiserError::UnknownAlgorithm(s.to_string()))
    }
}
