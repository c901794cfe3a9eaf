/// Error type shared by the core and its hosts
use thiserror::Error;

/// Failures raised by the versor pipeline and its collaborators.
///
/// `DegenerateAxis` and `InvalidAxisInput` are recoverable: the render loop
/// keeps the previous axis and carries on. Resource and parse failures are
/// only raised during startup and stop the loop from ever running.
#[derive(Debug, Error)]
pub enum VersorError {
    #[error("rotation axis has zero length")]
    DegenerateAxis,

    #[error("failed to load {path}: {reason}")]
    ResourceLoad { path: String, reason: String },

    #[error("mesh parse error on line {line}: {reason}")]
    MeshParse { line: usize, reason: String },

    #[error("invalid axis input: {0:?}")]
    InvalidAxisInput(String),

    #[error("step of {0} degrees per frame is outside [0, 360)")]
    InvalidStep(f32),

    #[error("render loop has not been initialized")]
    NotRunning,

    #[error("render backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VersorError>;
