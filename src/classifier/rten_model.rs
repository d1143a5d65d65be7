use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::Tensor;
use std::path::Path;

use crate::classifier::{ClassDistribution, DigitClassifier, ModelArchitecture};
use crate::error::{RecognitionError, Result};
use crate::models::NormalizedPatch;

/// Digit classifier backed by a `.rten` model file.
///
/// The model's single output is read as ten raw class scores.
pub struct RtenClassifier {
    model: Model,
    arch: ModelArchitecture,
}

impl RtenClassifier {
    pub fn load(arch: ModelArchitecture, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecognitionError::ModelLoad {
                path: path.to_path_buf(),
                reason: "weights file not found".to_string(),
            });
        }

        let model = Model::load_file(path).map_err(|e| RecognitionError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self { model, arch })
    }

    pub fn architecture(&self) -> ModelArchitecture {
        self.arch
    }
}

impl DigitClassifier for RtenClassifier {
    fn classify(&self, patch: &NormalizedPatch) -> Result<ClassDistribution> {
        let input = Tensor::from_data(self.arch.input_shape().as_slice(), patch.data().to_vec());

        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|e| RecognitionError::Inference(e.to_string()))?;
        let scores = Tensor::<f32>::try_from(output)
            .map_err(|e| RecognitionError::Inference(format!("unexpected output: {:?}", e)))?;

        ClassDistribution::from_logits(&scores.to_vec())
    }

    fn name(&self) -> &str {
        self.arch.id()
    }
}
