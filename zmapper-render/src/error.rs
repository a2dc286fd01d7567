use thiserror::Error;

/// Errors originating from the mapping and drawing pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid path plot: {reason}")]
    InvalidPath { reason: String },

    #[error("PNG export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Core(#[from] zmapper_core::CoreError),
}

impl From<zmapper_core::ParseError> for RenderError {
    fn from(e: zmapper_core::ParseError) -> Self {
        Self::Core(e.into())
    }
}

impl From<zmapper_core::EvaluationError> for RenderError {
    fn from(e: zmapper_core::EvaluationError) -> Self {
        Self::Core(e.into())
    }
}
