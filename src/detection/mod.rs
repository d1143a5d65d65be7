pub mod preprocessing;
pub mod contours;
pub mod segmentation;
pub mod normalize;
pub mod aggregate;

use image::DynamicImage;

use crate::classifier::DigitClassifier;
use crate::error::{RecognitionError, Result};
use crate::models::{BinaryMask, ClassificationResult, GlyphRegion, Prediction};
use crate::pipeline::{PipelineConfig, PipelineContext};
use aggregate::GlyphAttempt;

/// Image in, digits out: preprocess, segment, normalize, classify, aggregate.
///
/// Holds no model; the classifier is handed in per call so the same
/// pipeline can serve any number of models.
#[derive(Debug, Clone, Default)]
pub struct DigitPipeline {
    pub config: PipelineConfig,
    pub context: PipelineContext,
}

/// Intermediate results of the first two stages
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub mask: BinaryMask,
    pub glyphs: Vec<GlyphRegion>,
    /// True when no contour was found and the whole frame stands in
    pub used_fallback: bool,
}

impl DigitPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            context: PipelineContext::default(),
        }
    }

    pub fn with_context(mut self, context: PipelineContext) -> Self {
        self.context = context;
        self
    }

    /// Stages 1 and 2, with the whole-frame fallback applied
    pub fn segment_image(&self, image: &DynamicImage) -> Segmentation {
        self.context.dump_input(image);

        tracing::debug!("preprocessing {}x{} image", image.width(), image.height());
        let mask = preprocessing::preprocess(image, &self.config);
        self.context.dump_mask(mask.as_image());

        let found = contours::find_external_contours(mask.as_image());
        let mut glyphs = segmentation::segment_contours(&mask, &found, &self.config);
        // Only a mask without any contour falls back; all-noise masks stay empty
        let used_fallback = found.is_empty();
        if used_fallback {
            tracing::debug!("no contours found, classifying the whole frame");
            glyphs.push(segmentation::fallback_region(
                image,
                self.config.fallback_threshold,
            ));
        }

        for (i, glyph) in glyphs.iter().enumerate() {
            self.context.dump_glyph(i, &glyph.image);
        }

        Segmentation {
            mask,
            glyphs,
            used_fallback,
        }
    }

    /// Recognize every digit in `image`.
    ///
    /// Fails only when the classifier is not ready. Glyphs that cannot be
    /// normalized or classified are dropped from the result.
    pub fn predict(
        &self,
        image: &DynamicImage,
        classifier: &dyn DigitClassifier,
    ) -> Result<Prediction> {
        if !classifier.is_ready() {
            return Err(RecognitionError::ModelNotReady);
        }

        let segmentation = self.segment_image(image);
        tracing::debug!(
            "classifying {} glyphs with {}",
            segmentation.glyphs.len(),
            classifier.name()
        );

        let attempts = segmentation
            .glyphs
            .iter()
            .map(|glyph| GlyphAttempt {
                placement: glyph.placement,
                outcome: classify_glyph(glyph, classifier),
            })
            .collect();

        let prediction = aggregate::aggregate(attempts);
        tracing::debug!(
            "recognized {:?} (confidence {:.3}, {} skipped)",
            prediction.report.digit,
            prediction.report.confidence,
            prediction.skipped
        );
        Ok(prediction)
    }
}

/// Stages 3 and 4 for a single glyph
pub fn classify_glyph(
    glyph: &GlyphRegion,
    classifier: &dyn DigitClassifier,
) -> Result<ClassificationResult> {
    let patch = normalize::normalize(glyph)?;
    let distribution = classifier.classify(&patch)?;
    Ok(distribution.argmax())
}
