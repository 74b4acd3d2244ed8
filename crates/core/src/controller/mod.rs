use tracing::{debug, info, warn};

use crate::algorithms::{AlgorithmKind, Halt, Stepper};
use crate::config::AnimationConfig;
use crate::dataset::{Dataset, RandomValues, ValueSource, ARRAY_SIZE};
use crate::render::{Canvas, Frame, RenderTarget};
use crate::signal::{LineId, LineSink, StepEmitter};
use crate::timeline::{step_delay, RunFlag};
use crate::{Result, VisualiserError};

/// How a call to [`AnimationController::animate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The algorithm ran to its natural end.
    Completed { steps: u64 },
    /// `cleanup` cancelled the run.
    Stopped { steps: u64 },
}

impl RunOutcome {
    pub fn steps(&self) -> u64 {
        match *self {
            RunOutcome::Completed { steps } | RunOutcome::Stopped { steps } => steps,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Cancels a controller's run from outside the `animate` borrow, including
/// from another thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    run: RunFlag,
    emitter: StepEmitter,
}

impl StopHandle {
    /// Same contract as [`AnimationController::cleanup`].
    pub fn cleanup(&self) {
        self.run.stop();
        self.emitter.idle();
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }
}

struct Session {
    dataset: Dataset,
    target: Box<dyn RenderTarget>,
    canvas: Canvas,
}

/// Drives one algorithm through `initialize`, `animate` and `cleanup`.
///
/// A controller owns the dataset of the current run; re-initializing discards
/// it wholesale. `animate` borrows the controller mutably, so overlapping runs
/// on the same instance cannot be expressed.
pub struct AnimationController {
    kind: AlgorithmKind,
    array_size: usize,
    values: Box<dyn ValueSource>,
    run: RunFlag,
    emitter: StepEmitter,
    session: Option<Session>,
}

impl AnimationController {
    /// Creates an idle controller that draws bar values from entropy.
    pub fn new(kind: AlgorithmKind) -> Self {
        Self {
            kind,
            array_size: ARRAY_SIZE,
            values: Box::new(RandomValues::from_entropy()),
            run: RunFlag::new(),
            emitter: StepEmitter::new(),
            session: None,
        }
    }

    pub fn from_config(kind: AlgorithmKind, config: &AnimationConfig) -> Self {
        let values = match config.seed {
            Some(seed) => RandomValues::seeded(seed),
            None => RandomValues::from_entropy(),
        };
        Self::new(kind)
            .with_array_size(config.array_size)
            .with_values(values)
    }

    /// Replaces the source of bar values used by the next `initialize`.
    pub fn with_values(mut self, values: impl ValueSource + 'static) -> Self {
        self.values = Box::new(values);
        self
    }

    /// Clamped to `1..=ARRAY_SIZE`.
    pub fn with_array_size(mut self, size: usize) -> Self {
        self.array_size = size.clamp(1, ARRAY_SIZE);
        self
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.session.as_ref().map(|session| &session.dataset)
    }

    pub fn canvas(&self) -> Option<Canvas> {
        self.session.as_ref().map(|session| session.canvas)
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Last line id forwarded to the sink, if any.
    pub fn current_line(&self) -> Option<LineId> {
        self.emitter.last()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            run: self.run.clone(),
            emitter: self.emitter.clone(),
        }
    }

    /// Builds a fresh dataset, marks the controller idle and renders once.
    pub fn initialize(
        &mut self,
        target: impl RenderTarget + 'static,
        width: f32,
        height: f32,
        line_sink: Option<LineSink>,
    ) -> Result<()> {
        let canvas = Canvas::new(width, height)?;

        self.run.stop();
        self.session = None;
        self.emitter.attach(line_sink);

        let mut dataset = self.kind.create_dataset(self.array_size, self.values.as_mut());
        dataset.reset_states();

        let mut target: Box<dyn RenderTarget> = Box::new(target);
        target.present(&Frame {
            snapshot: (&dataset).into(),
            canvas,
            step: 0,
        })?;

        debug!(algorithm = %self.kind, width, height, "initialized controller");
        self.session = Some(Session {
            dataset,
            target,
            canvas,
        });
        Ok(())
    }

    /// Runs the algorithm from the current values with one step every
    /// `1000 / speed` milliseconds. State tags are reset before the first
    /// step. Cancellation through [`cleanup`](Self::cleanup) or a
    /// [`StopHandle`] resolves to [`RunOutcome::Stopped`].
    pub async fn animate(&mut self, speed: f64) -> Result<RunOutcome> {
        let delay = step_delay(speed)?;
        let kind = self.kind;
        let session = self
            .session
            .as_mut()
            .ok_or(VisualiserError::NotInitialized(kind.name()))?;

        session.dataset.reset_states();
        self.run.start();
        debug!(algorithm = %kind, delay_ms = delay.as_millis() as u64, "starting run");

        let mut stepper = Stepper::new(
            &self.run,
            &self.emitter,
            session.target.as_mut(),
            session.canvas,
            delay,
        );
        let flow = kind.execute(&mut session.dataset, &mut stepper).await;
        let steps = stepper.steps();

        match flow {
            Ok(()) => {
                self.run.stop();
                self.emitter.idle();
                info!(algorithm = %kind, steps, "run completed");
                Ok(RunOutcome::Completed { steps })
            }
            Err(Halt::Cancelled) => {
                // a stop landing between the running check and the emit lets
                // the step's line overwrite the idle signal
                self.emitter.idle();
                debug!(algorithm = %kind, steps, "run stopped");
                Ok(RunOutcome::Stopped { steps })
            }
            Err(Halt::Failed(error)) => {
                self.cleanup();
                warn!(algorithm = %kind, steps, %error, "run aborted");
                Err(error)
            }
        }
    }

    /// Idempotent: clears the running flag, aborting any pending step, and
    /// emits the idle line if a sink is attached.
    pub fn cleanup(&self) {
        if self.run.stop() {
            debug!(algorithm = %self.kind, "cleanup cancelled a running animation");
        }
        self.emitter.idle();
    }
}

impl std::fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("kind", &self.kind)
            .field("array_size", &self.array_size)
            .field("running", &self.run.is_running())
            .field("dataset", &self.dataset())
            .field("emitter", &self.emitter)
            .finish()
    }
}
