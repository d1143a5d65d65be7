use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the recognition pipeline and the model provider.
///
/// Only [`RecognitionError::ModelNotReady`] aborts a whole `predict` call.
/// Everything else is attached to the glyph it happened on and the glyph
/// is dropped from the report.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("model not ready")]
    ModelNotReady,

    #[error("contour {index} has a degenerate bounding box")]
    DegenerateContour { index: usize },

    #[error("glyph patch is empty")]
    EmptyGlyph,

    #[error("invalid patch: {0}")]
    InvalidPatch(String),

    #[error("invalid class distribution: {0}")]
    InvalidDistribution(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("unknown model architecture: {0}")]
    UnknownArchitecture(String),
}

pub type Result<T> = std::result::Result<T, RecognitionError>;
