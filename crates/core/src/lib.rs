//! Core library for the Algorithm Visualiser.
//!
//! The crate animates four textbook algorithms (bubble sort, quicksort,
//! breadth-first and depth-first search) one step at a time. Each step tags
//! the affected elements, hands a frame to a render target, signals the
//! matching pseudocode line and pauses for `1000 / speed` milliseconds. The
//! pause is the cancellation point: `cleanup` aborts it immediately.
//!
//! ```ignore
//! let recorder = Recorder::default();
//! let mut controller = AnimationController::new(AlgorithmKind::BubbleSort);
//! controller.initialize(recorder.clone(), 800.0, 400.0, Some(recorder.line_sink()))?;
//! let outcome = controller.animate(2.0).await?;
//! ```

pub mod algorithms;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod record;
pub mod registry;
pub mod render;
pub mod signal;
pub mod timeline;

pub use algorithms::AlgorithmKind;
pub use config::{AnimationConfig, AppConfig, CanvasConfig};
pub use controller::{AnimationController, RunOutcome, StopHandle};
pub use dataset::{
    build_fixed_tree, generate_array, Dataset, Element, ElementState, Node, NodeState,
    RandomValues, ScriptedValues, ValueSource,
};
pub use error::{Result, VisualiserError};
pub use record::{RecordEvent, Recorder, RecordingSettings};
pub use registry::{AlgorithmEntry, AlgorithmRegistry};
pub use render::{Canvas, Color, DrawCommand, Frame, Palette, RenderTarget, Snapshot};
pub use signal::{LineId, LineSink, StepEmitter};
pub use timeline::{step_delay, within_slider, RunFlag, Suspension};
