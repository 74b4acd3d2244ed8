use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::ARRAY_SIZE;
use crate::timeline::DEFAULT_SPEED;
use crate::{Result, VisualiserError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub animation: AnimationConfig,
    pub canvas: CanvasConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.animation.validate()?;
        self.canvas.validate()
    }
}

/// Settings consumed by the animation controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub speed: f64,
    pub array_size: usize,
    /// Seed for the bar values; entropy is used when absent.
    pub seed: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            array_size: ARRAY_SIZE,
            seed: None,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(VisualiserError::InvalidSpeed(self.speed));
        }
        if !(1..=ARRAY_SIZE).contains(&self.array_size) {
            return Err(VisualiserError::InvalidInput(
                "array size must be between 1 and 15",
            ));
        }
        Ok(())
    }
}

/// Size of the drawing surface handed to `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<()> {
        crate::render::Canvas::new(self.width, self.height).map(|_| ())
    }
}
