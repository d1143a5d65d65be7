use crate::error::RecognitionError;
use crate::models::{Annotation, ClassificationResult, GlyphPlacement, Prediction, PredictionReport};

/// Outcome of normalizing and classifying one glyph
#[derive(Debug)]
pub struct GlyphAttempt {
    pub placement: Option<GlyphPlacement>,
    pub outcome: Result<ClassificationResult, RecognitionError>,
}

/// Fold per-glyph outcomes, already in reading order, into a prediction.
///
/// Failed glyphs are logged and left out of both the digit string and the
/// confidence list, so positions in the report no longer line up with
/// positions in `attempts` once anything fails.
pub fn aggregate(attempts: Vec<GlyphAttempt>) -> Prediction {
    let glyph_count = attempts.len();
    let mut digit = String::new();
    let mut probabilities = Vec::new();
    let mut annotations = Vec::new();

    for (i, attempt) in attempts.into_iter().enumerate() {
        match attempt.outcome {
            Ok(result) => {
                digit.push(result.label);
                probabilities.push(result.confidence.clamp(0.0, 1.0));
                if let Some(p) = attempt.placement {
                    annotations.push(Annotation {
                        x: p.x,
                        y: p.y,
                        side: p.side,
                        label: result.label,
                    });
                }
            }
            Err(err) => {
                tracing::warn!("glyph {} skipped: {}", i, err);
            }
        }
    }

    let confidence = mean_confidence(&probabilities);
    let skipped = glyph_count - probabilities.len();

    Prediction {
        report: PredictionReport {
            digit,
            confidence,
            probabilities,
        },
        annotations,
        glyph_count,
        skipped,
    }
}

/// Arithmetic mean, 0.0 for no values
pub fn mean_confidence(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}
