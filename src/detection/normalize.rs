use image::imageops::{resize, FilterType};

use crate::error::{RecognitionError, Result};
use crate::models::{GlyphRegion, NormalizedPatch, PATCH_SIZE};

/// Resize a square glyph to the classifier's 28x28 grid and scale to [0, 1].
///
/// Bilinear (triangle) filtering keeps thin strokes connected when shrinking.
/// A glyph without any foreground has nothing to classify and is refused.
pub fn normalize(glyph: &GlyphRegion) -> Result<NormalizedPatch> {
    let (w, h) = glyph.image.dimensions();
    if w == 0 || h == 0 || glyph.image.pixels().all(|p| p[0] == 0) {
        return Err(RecognitionError::EmptyGlyph);
    }

    let resized = resize(&glyph.image, PATCH_SIZE, PATCH_SIZE, FilterType::Triangle);
    let data = resized.pixels().map(|p| p[0] as f32 / 255.0).collect();
    NormalizedPatch::from_data(data)
}
