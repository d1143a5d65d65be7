mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from handdigits for tests
pub use handdigits::{
    BinaryMask, ClassDistribution, DigitClassifier, DigitPipeline, NormalizedPatch,
    PipelineConfig, PipelineContext, Prediction, PredictionReport, Predictor, RecognitionError,
};
