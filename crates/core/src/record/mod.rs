use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::render::{DrawCommand, Frame, Palette, RenderTarget};
use crate::signal::{LineId, LineSink};
use crate::{Result, VisualiserError};

/// Configuration options for the recording subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// Store the laid-out draw commands next to each dataset snapshot.
    pub capture_geometry: bool,
    pub palette: Palette,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            capture_geometry: false,
            palette: Palette::default(),
        }
    }
}

/// One entry of a recorded run, in the order the engine produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RecordEvent {
    Frame {
        step: u64,
        dataset: Dataset,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        commands: Option<Vec<DrawCommand>>,
    },
    Line {
        line: LineId,
    },
}

/// Render target and line sink that log everything they receive. Clones share
/// the same log, so a clone can be handed to a controller while this handle
/// is kept for inspection or export.
#[derive(Clone, Default)]
pub struct Recorder {
    settings: RecordingSettings,
    events: Arc<Mutex<Vec<RecordEvent>>>,
}

impl Recorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sink that appends [`RecordEvent::Line`] entries to this recorder.
    pub fn line_sink(&self) -> LineSink {
        let events = self.events.clone();
        Arc::new(move |line| {
            if let Ok(mut events) = events.lock() {
                events.push(RecordEvent::Line { line });
            }
        })
    }

    pub fn events(&self) -> Result<Vec<RecordEvent>> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Datasets of every recorded frame.
    pub fn frames(&self) -> Result<Vec<Dataset>> {
        Ok(self
            .lock()?
            .iter()
            .filter_map(|event| match event {
                RecordEvent::Frame { dataset, .. } => Some(dataset.clone()),
                RecordEvent::Line { .. } => None,
            })
            .collect())
    }

    pub fn lines(&self) -> Result<Vec<LineId>> {
        Ok(self
            .lock()?
            .iter()
            .filter_map(|event| match event {
                RecordEvent::Line { line } => Some(*line),
                RecordEvent::Frame { .. } => None,
            })
            .collect())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.lock()?)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &*self.lock()?)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<RecordEvent>>> {
        self.events
            .lock()
            .map_err(|_| VisualiserError::msg("recording log has been poisoned"))
    }
}

impl RenderTarget for Recorder {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        let commands = self
            .settings
            .capture_geometry
            .then(|| frame.draw_commands_with(&self.settings.palette));
        self.lock()?.push(RecordEvent::Frame {
            step: frame.step,
            dataset: frame.snapshot.to_dataset(),
            commands,
        });
        Ok(())
    }
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("settings", &self.settings)
            .field("events", &self.len().unwrap_or_default())
            .finish()
    }
}
