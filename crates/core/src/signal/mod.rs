use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Line of the displayed pseudocode listing that corresponds to the current
/// step. Values are private to each algorithm apart from [`LineId::IDLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(i32);

impl LineId {
    /// No line active; the algorithm is idle.
    pub const IDLE: LineId = LineId(-1);

    pub const fn new(line: i32) -> Self {
        Self(line)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    pub fn is_idle(self) -> bool {
        self == Self::IDLE
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External consumer of line signals, typically a code-highlight pane.
pub type LineSink = Arc<dyn Fn(LineId) + Send + Sync>;

/// Forwards line ids to an optional sink. Clones share the same sink slot, so
/// a sink attached through one clone is seen by all of them.
#[derive(Clone, Default)]
pub struct StepEmitter {
    inner: Arc<Mutex<EmitterState>>,
}

#[derive(Default)]
struct EmitterState {
    sink: Option<LineSink>,
    last: Option<LineId>,
}

impl StepEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sink and forgets the previously emitted line.
    pub fn attach(&self, sink: Option<LineSink>) {
        let mut state = self.lock();
        state.sink = sink;
        state.last = None;
    }

    pub fn has_sink(&self) -> bool {
        self.lock().sink.is_some()
    }

    pub fn last(&self) -> Option<LineId> {
        self.lock().last
    }

    pub fn emit(&self, line: LineId) {
        let sink = {
            let mut state = self.lock();
            state.last = Some(line);
            state.sink.clone()
        };
        if let Some(sink) = sink {
            sink(line);
        }
    }

    /// Emits [`LineId::IDLE`] unless it was already the last signal.
    pub fn idle(&self) {
        let sink = {
            let mut state = self.lock();
            if state.last == Some(LineId::IDLE) {
                return;
            }
            state.last = Some(LineId::IDLE);
            state.sink.clone()
        };
        if let Some(sink) = sink {
            sink(LineId::IDLE);
        }
    }

    // Emission is fire-and-forget; a panicking sink must not wedge the engine.
    fn lock(&self) -> MutexGuard<'_, EmitterState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for StepEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("StepEmitter")
            .field("has_sink", &state.sink.is_some())
            .field("last", &state.last)
            .finish()
    }
}
