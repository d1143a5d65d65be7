use image::{DynamicImage, GrayImage, Luma};
use image::imageops::{crop_imm, overlay};
use imageproc::contrast::{threshold, ThresholdType};

use crate::detection::contours::{self, BoundingRect, GlyphContour};
use crate::error::{RecognitionError, Result};
use crate::models::{BinaryMask, GlyphPlacement, GlyphRegion};
use crate::pipeline::PipelineConfig;

/// Side of the padded square, or `None` when it does not fit source
/// coordinates.
pub fn padded_side(w: u32, h: u32, margin: u32) -> Option<u32> {
    margin
        .checked_mul(2)
        .and_then(|border| w.max(h).checked_add(border))
        .filter(|&side| i32::try_from(side).is_ok())
}

/// Pad a `w`x`h` crop into a square with the glyph centered and `margin`
/// black pixels on every side.
///
/// The shorter axis gets `|w - h| / 2` on each side; when the difference is
/// odd the spare pixel goes right (or below). Returns the patch and the
/// padding added before the glyph on the short axis, or `None` when the
/// margin is too large for the padded side to be addressed.
pub fn square_pad(crop: &GrayImage, margin: u32) -> Option<(GrayImage, u32)> {
    let (w, h) = crop.dimensions();
    let d = w.abs_diff(h) / 2;
    let side = padded_side(w, h, margin)?;

    let (left, top) = if w <= h {
        (margin + d, margin)
    } else {
        (margin, margin + d)
    };

    let mut canvas = GrayImage::from_pixel(side, side, Luma([0]));
    overlay(&mut canvas, crop, left as i64, top as i64);
    Some((canvas, d))
}

/// Where the padded patch sits in source coordinates
pub fn placement_for(rect: &BoundingRect, d: u32, margin: u32) -> Option<GlyphPlacement> {
    let side = padded_side(rect.w, rect.h, margin)?;
    // side fits i32, so do margin and d
    let (x0, y0) = (i64::from(rect.x), i64::from(rect.y));
    let (d, margin) = (i64::from(d), i64::from(margin));
    let (x, y) = if rect.w <= rect.h {
        (x0 - d - margin, y0 - margin)
    } else {
        (x0 - margin, y0 - d - margin)
    };
    Some(GlyphPlacement {
        x: i32::try_from(x).ok()?,
        y: i32::try_from(y).ok()?,
        side,
    })
}

/// Cut one accepted contour out of the mask as a square glyph
pub fn extract_glyph(
    mask: &GrayImage,
    contour: &GlyphContour,
    config: &PipelineConfig,
) -> Result<GlyphRegion> {
    let degenerate = || RecognitionError::DegenerateContour {
        index: contour.index,
    };

    let rect = contours::bounding_rect(contour, config.approx_epsilon_ratio)?;
    if rect.w == 0
        || rect.h == 0
        || rect.x + rect.w > mask.width()
        || rect.y + rect.h > mask.height()
    {
        return Err(degenerate());
    }

    let crop = crop_imm(mask, rect.x, rect.y, rect.w, rect.h).to_image();
    let (image, d) = square_pad(&crop, config.margin).ok_or_else(degenerate)?;
    let placement = placement_for(&rect, d, config.margin).ok_or_else(degenerate)?;

    Ok(GlyphRegion {
        image,
        placement: Some(placement),
        contour_index: contour.index,
    })
}

/// Split the mask into square glyphs in reading order.
///
/// Returns nothing when the mask holds no contour at all; filtering every
/// contour as noise also returns nothing.
pub fn segment(mask: &BinaryMask, config: &PipelineConfig) -> Vec<GlyphRegion> {
    let found = contours::find_external_contours(mask.as_image());
    segment_contours(mask, &found, config)
}

/// [`segment`] over contours the caller already extracted
pub fn segment_contours(
    mask: &BinaryMask,
    found: &[GlyphContour],
    config: &PipelineConfig,
) -> Vec<GlyphRegion> {
    tracing::debug!("found {} external contours", found.len());

    let mut glyphs: Vec<GlyphRegion> = found
        .iter()
        .filter(|c| c.area() >= config.min_contour_area)
        .filter_map(|c| match extract_glyph(mask.as_image(), c, config) {
            Ok(glyph) => Some(glyph),
            Err(err) => {
                tracing::warn!("skipping contour {}: {}", c.index, err);
                None
            }
        })
        .collect();

    // Vec::sort_by_key is stable, so ties keep discovery order
    glyphs.sort_by_key(|g| g.origin_x());

    tracing::debug!("{} glyphs after noise filtering", glyphs.len());
    glyphs
}

/// Whole frame as one glyph, for inputs the contour pass found nothing in
pub fn fallback_region(image: &DynamicImage, fallback_threshold: u8) -> GlyphRegion {
    let gray = image.to_luma8();
    GlyphRegion {
        image: threshold(&gray, fallback_threshold, ThresholdType::BinaryInverted),
        placement: None,
        contour_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tall_crop_pads_left_and_right() {
        let crop = GrayImage::from_pixel(10, 30, Luma([255]));
        let (patch, d) = square_pad(&crop, 20).unwrap();
        assert_eq!(d, 10);
        assert_eq!(patch.dimensions(), (70, 70));
        assert_eq!(patch.get_pixel(29, 35)[0], 0);
        assert_eq!(patch.get_pixel(30, 35)[0], 255);
        assert_eq!(patch.get_pixel(39, 35)[0], 255);
        assert_eq!(patch.get_pixel(40, 35)[0], 0);
    }

    #[test]
    fn wide_crop_pads_top_and_bottom() {
        let crop = GrayImage::from_pixel(30, 10, Luma([255]));
        let (patch, _) = square_pad(&crop, 20).unwrap();
        assert_eq!(patch.dimensions(), (70, 70));
        assert_eq!(patch.get_pixel(35, 29)[0], 0);
        assert_eq!(patch.get_pixel(35, 30)[0], 255);
    }

    #[test]
    fn odd_difference_still_square() {
        let crop = GrayImage::from_pixel(11, 30, Luma([255]));
        let (patch, d) = square_pad(&crop, 20).unwrap();
        assert_eq!(d, 9);
        assert_eq!(patch.width(), patch.height());
    }

    #[test]
    fn placement_moves_origin_by_padding() {
        let rect = BoundingRect { x: 50, y: 40, w: 10, h: 30 };
        let p = placement_for(&rect, 10, 20).unwrap();
        assert_eq!(p, GlyphPlacement { x: 20, y: 20, side: 70 });
    }

    #[test]
    fn oversized_margin_is_refused() {
        let crop = GrayImage::from_pixel(10, 30, Luma([255]));
        assert!(square_pad(&crop, u32::MAX / 2).is_none());
        assert_eq!(padded_side(10, 30, u32::MAX / 2), None);
        assert_eq!(padded_side(10, 30, 20), Some(70));

        let rect = BoundingRect { x: 50, y: 40, w: 10, h: 30 };
        assert!(placement_for(&rect, 10, u32::MAX / 2).is_none());
    }
}
