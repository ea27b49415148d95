use thiserror::Error;

/// Why a render target could not be acquired.
///
/// None of these is fatal: the engine logs it and keeps running without a
/// surface until the host offers a window again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// No display connection, or no configuration that fits the request.
    #[error("no usable display configuration")]
    Config,

    #[error("unable to bind rendering context: {0}")]
    Bind(String),
}

/// A saved-state blob that does not match the persisted layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("saved state is {actual} bytes, expected {expected}")]
    Size { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}
