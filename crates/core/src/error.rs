/// Result alias that carries the custom [`VisualiserError`] type.
pub type Result<T> = std::result::Result<T, VisualiserError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum VisualiserError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration or recording (de)serialisation failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Speed must be a finite number greater than zero.
    #[error("invalid animation speed {0}; expected a positive number")]
    InvalidSpeed(f64),
    #[error("invalid canvas size {width}x{height}; both sides must be positive")]
    InvalidCanvas { width: f32, height: f32 },
    /// `animate` was called before `initialize` supplied a dataset.
    #[error("`{0}` has not been initialized")]
    NotInitialized(&'static str),
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    #[error("{0}")]
    InvalidInput(&'static str),
}

impl VisualiserError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VisualiserError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VisualiserError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
