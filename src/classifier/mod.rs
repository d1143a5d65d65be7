#[cfg(feature = "rten")]
mod rten_model;

#[cfg(feature = "rten")]
pub use rten_model::RtenClassifier;

use std::path::Path;
use std::str::FromStr;

use crate::error::{RecognitionError, Result};
use crate::models::{ClassificationResult, NormalizedPatch};

pub const NUM_CLASSES: usize = 10;

/// Anything that turns a normalized patch into digit probabilities.
///
/// Implementations must be deterministic for fixed weights and must not
/// depend on the order in which glyphs are classified.
pub trait DigitClassifier: Send + Sync {
    fn classify(&self, patch: &NormalizedPatch) -> Result<ClassDistribution>;

    /// Human-readable name of the backing model
    fn name(&self) -> &str;

    fn is_ready(&self) -> bool {
        true
    }
}

/// Probability per digit class, index = digit
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDistribution {
    probs: [f32; NUM_CLASSES],
}

impl ClassDistribution {
    pub fn from_probabilities(values: &[f32]) -> Result<Self> {
        if values.len() != NUM_CLASSES {
            return Err(RecognitionError::InvalidDistribution(format!(
                "expected {} classes, got {}",
                NUM_CLASSES,
                values.len()
            )));
        }
        if let Some(bad) = values
            .iter()
            .find(|v| !v.is_finite() || **v < -1e-4 || **v > 1.0 + 1e-4)
        {
            return Err(RecognitionError::InvalidDistribution(format!(
                "probability {} out of range",
                bad
            )));
        }

        let mut probs = [0.0; NUM_CLASSES];
        for (slot, v) in probs.iter_mut().zip(values) {
            *slot = v.clamp(0.0, 1.0);
        }
        Ok(Self { probs })
    }

    /// Softmax over raw model scores
    pub fn from_logits(logits: &[f32]) -> Result<Self> {
        if logits.len() != NUM_CLASSES {
            return Err(RecognitionError::InvalidDistribution(format!(
                "expected {} logits, got {}",
                NUM_CLASSES,
                logits.len()
            )));
        }
        if logits.iter().any(|v| !v.is_finite()) {
            return Err(RecognitionError::InvalidDistribution(
                "non-finite logit".to_string(),
            ));
        }

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
        let sum: f32 = exps.iter().sum();
        let probs: Vec<f32> = exps.iter().map(|e| e / sum).collect();
        Self::from_probabilities(&probs)
    }

    /// One-hot distribution, mostly useful for fixed-answer classifiers
    pub fn certain(digit: usize) -> Result<Self> {
        if digit >= NUM_CLASSES {
            return Err(RecognitionError::InvalidDistribution(format!(
                "no class {}",
                digit
            )));
        }
        let mut probs = [0.0; NUM_CLASSES];
        probs[digit] = 1.0;
        Ok(Self { probs })
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probs
    }

    /// Most likely digit. The lowest index wins a tie.
    pub fn argmax(&self) -> ClassificationResult {
        let mut best = 0;
        for (i, p) in self.probs.iter().enumerate() {
            if *p > self.probs[best] {
                best = i;
            }
        }
        ClassificationResult {
            label: char::from(b'0' + best as u8),
            class_index: best,
            confidence: self.probs[best].clamp(0.0, 1.0),
        }
    }
}

/// Input layout expected by a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelArchitecture {
    /// Flattened `[1, 784]`
    #[default]
    Mlp,
    /// Image-shaped `[1, 1, 28, 28]`
    Cnn,
}

impl ModelArchitecture {
    pub fn input_shape(&self) -> Vec<usize> {
        match self {
            ModelArchitecture::Mlp => vec![1, 784],
            ModelArchitecture::Cnn => vec![1, 1, 28, 28],
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            ModelArchitecture::Mlp => "mlp_model",
            ModelArchitecture::Cnn => "cnn_model",
        }
    }
}

impl FromStr for ModelArchitecture {
    type Err = RecognitionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mlp" | "mlp_model" => Ok(ModelArchitecture::Mlp),
            "cnn" | "cnn_model" => Ok(ModelArchitecture::Cnn),
            other => Err(RecognitionError::UnknownArchitecture(other.to_string())),
        }
    }
}

/// Build a ready classifier for `model_id` from the weights at `weights`.
#[cfg(feature = "rten")]
pub fn load_classifier(model_id: &str, weights: &Path) -> Result<Box<dyn DigitClassifier>> {
    let arch: ModelArchitecture = model_id.parse()?;
    tracing::info!("loading {} weights from {}", arch.id(), weights.display());
    Ok(Box::new(RtenClassifier::load(arch, weights)?))
}

#[cfg(not(feature = "rten"))]
pub fn load_classifier(model_id: &str, weights: &Path) -> Result<Box<dyn DigitClassifier>> {
    let _arch: ModelArchitecture = model_id.parse()?;
    Err(RecognitionError::ModelLoad {
        path: weights.to_path_buf(),
        reason: "built without the `rten` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_picks_largest_logit() {
        let mut logits = [0.0f32; 10];
        logits[7] = 5.0;
        let dist = ClassDistribution::from_logits(&logits).unwrap();
        let result = dist.argmax();
        assert_eq!(result.label, '7');
        assert!(result.confidence > 0.9 && result.confidence <= 1.0);
        let total: f32 = dist.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tie_goes_to_lowest_digit() {
        let dist = ClassDistribution::from_probabilities(&[0.1; 10]).unwrap();
        assert_eq!(dist.argmax().label, '0');
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(ClassDistribution::from_probabilities(&[0.5, 0.5]).is_err());
        assert!(ClassDistribution::from_logits(&[1.0; 11]).is_err());
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut values = [0.0f32; 10];
        values[2] = 1.5;
        assert!(ClassDistribution::from_probabilities(&values).is_err());
        values[2] = f32::NAN;
        assert!(ClassDistribution::from_probabilities(&values).is_err());
    }

    #[test]
    fn architecture_ids() {
        assert_eq!("mlp_model".parse::<ModelArchitecture>().unwrap(), ModelArchitecture::Mlp);
        assert_eq!("CNN".parse::<ModelArchitecture>().unwrap(), ModelArchitecture::Cnn);
        assert!("resnet".parse::<ModelArchitecture>().is_err());
        assert_eq!(ModelArchitecture::Cnn.input_shape(), vec![1, 1, 28, 28]);
    }
}
