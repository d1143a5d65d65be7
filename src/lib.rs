pub mod classifier;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod visualize;

pub use classifier::{load_classifier, ClassDistribution, DigitClassifier, ModelArchitecture};
pub use detection::{DigitPipeline, Segmentation};
pub use error::RecognitionError;
pub use models::{
    Annotation, BinaryMask, ClassificationResult, GlyphPlacement, GlyphRegion, NormalizedPatch,
    Prediction, PredictionReport,
};
pub use pipeline::{DebugConfig, PipelineConfig, PipelineContext};
pub use predictor::{ModelInfo, Predictor};
