use image::DynamicImage;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::classifier::{self, DigitClassifier};
use crate::detection::DigitPipeline;
use crate::error::{RecognitionError, Result};
use crate::models::Prediction;
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub ready: bool,
}

/// Pipeline plus the classifier it runs with.
///
/// Build once at startup, `load` a model, then share it read-only across
/// requests. Until a model is loaded every `predict` fails with
/// [`RecognitionError::ModelNotReady`].
#[derive(Clone, Default)]
pub struct Predictor {
    pipeline: DigitPipeline,
    classifier: Option<Arc<dyn DigitClassifier>>,
}

impl Predictor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            pipeline: DigitPipeline::new(config),
            classifier: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: DigitPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn DigitClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the current model with one loaded from disk.
    ///
    /// On failure the previous model, if any, stays in place.
    pub fn load(&mut self, model_id: &str, weights: &Path) -> Result<()> {
        let loaded = classifier::load_classifier(model_id, weights)?;
        tracing::info!("model {} ready", loaded.name());
        self.classifier = Some(Arc::from(loaded));
        Ok(())
    }

    pub fn unload(&mut self) {
        self.classifier = None;
    }

    pub fn is_ready(&self) -> bool {
        self.classifier.as_ref().is_some_and(|c| c.is_ready())
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.classifier.as_ref().map(|c| ModelInfo {
            model_type: c.name().to_string(),
            ready: c.is_ready(),
        })
    }

    pub fn pipeline(&self) -> &DigitPipeline {
        &self.pipeline
    }

    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction> {
        let classifier = self
            .classifier
            .as_deref()
            .ok_or(RecognitionError::ModelNotReady)?;
        self.pipeline.predict(image, classifier)
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("pipeline", &self.pipeline)
            .field("model", &self.classifier.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}
