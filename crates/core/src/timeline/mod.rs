use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::{Result, VisualiserError};

/// Bounds of the speed slider in the reference controls.
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 3.0;
pub const DEFAULT_SPEED: f64 = 1.0;
/// Floor applied to the per-step pause so very high speeds never yield a
/// zero-length suspension.
pub const MIN_STEP_DELAY: Duration = Duration::from_millis(1);

/// Whether `speed` lies on the reference speed slider. Speeds outside it are
/// still accepted by [`step_delay`].
pub fn within_slider(speed: f64) -> bool {
    (MIN_SPEED..=MAX_SPEED).contains(&speed)
}

/// Converts a speed multiplier into the pause between two steps
/// (`1000 / speed` milliseconds).
pub fn step_delay(speed: f64) -> Result<Duration> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(VisualiserError::InvalidSpeed(speed));
    }
    let delay = Duration::try_from_secs_f64(1.0 / speed)
        .map_err(|_| VisualiserError::InvalidSpeed(speed))?;
    Ok(delay.max(MIN_STEP_DELAY))
}

/// How a suspension between two steps ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    /// The full delay elapsed while the run was still active.
    Elapsed,
    /// The run flag was cleared before or during the delay.
    Cancelled,
}

/// Shared running flag of a controller. Clearing it wakes every pending
/// [`RunFlag::suspend`] immediately.
#[derive(Debug, Clone)]
pub struct RunFlag {
    state: Arc<watch::Sender<bool>>,
}

impl RunFlag {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn start(&self) {
        self.state.send_replace(true);
    }

    /// Clears the flag and returns whether it was set.
    pub fn stop(&self) -> bool {
        self.state.send_replace(false)
    }

    pub fn is_running(&self) -> bool {
        *self.state.borrow()
    }

    /// Waits for `delay` unless the flag is cleared first.
    pub async fn suspend(&self, delay: Duration) -> Suspension {
        let mut flag = self.state.subscribe();
        if !*flag.borrow_and_update() {
            return Suspension::Cancelled;
        }

        tokio::select! {
            biased;
            _ = flag.wait_for(|running| !*running) => Suspension::Cancelled,
            () = tokio::time::sleep(delay) => Suspension::Elapsed,
        }
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}
