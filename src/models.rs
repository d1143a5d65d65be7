use image::{GrayImage, Luma};
use serde::Serialize;

use crate::error::RecognitionError;

/// Two-level mask with ink as 255 on a 0 background.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// Re-quantize any gray image into a mask (`> 127` becomes foreground).
    pub fn from_image(mut image: GrayImage) -> Self {
        for pixel in image.pixels_mut() {
            *pixel = if pixel[0] > 127 { Luma([255]) } else { Luma([0]) };
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] > 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p[0] == 0)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }
}

/// Where a glyph sits in the source image, after square padding.
///
/// The origin can be negative when the padding reaches past the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub x: i32,
    pub y: i32,
    pub side: u32,
}

/// One candidate digit cut out of the mask.
#[derive(Debug, Clone)]
pub struct GlyphRegion {
    /// Square, padded, single-channel patch
    pub image: GrayImage,

    /// `None` for the whole-frame fallback region
    pub placement: Option<GlyphPlacement>,

    /// Discovery order of the contour this glyph came from
    pub contour_index: usize,
}

impl GlyphRegion {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// Sort key for reading order. The fallback region sorts at 0.
    pub fn origin_x(&self) -> i32 {
        self.placement.map(|p| p.x).unwrap_or(0)
    }
}

pub const PATCH_SIZE: u32 = 28;

/// Classifier input: a fixed 28x28 grid of intensities in [0, 1], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPatch {
    data: Vec<f32>,
}

impl NormalizedPatch {
    pub fn from_data(data: Vec<f32>) -> Result<Self, RecognitionError> {
        let expected = (PATCH_SIZE * PATCH_SIZE) as usize;
        if data.len() != expected {
            return Err(RecognitionError::InvalidPatch(format!(
                "patch has {} values, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self { data })
    }

    pub fn width(&self) -> u32 {
        PATCH_SIZE
    }

    pub fn height(&self) -> u32 {
        PATCH_SIZE
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * PATCH_SIZE + x) as usize]
    }

    pub fn mean_intensity(&self) -> f32 {
        self.data.iter().sum::<f32>() / self.data.len() as f32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: char,
    pub class_index: usize,
    pub confidence: f32,
}

/// Wire shape of a finished recognition.
///
/// `probabilities` runs parallel to `digit`, not to the glyphs found:
/// a glyph that failed classification leaves no trace in either, so a
/// failure in the middle of "3?7" reports "37".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub digit: String,
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

impl PredictionReport {
    pub fn empty() -> Self {
        Self {
            digit: String::new(),
            confidence: 0.0,
            probabilities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

/// Rectangle plus label for one recognized glyph, in source coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: i32,
    pub y: i32,
    pub side: u32,
    pub label: char,
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub report: PredictionReport,
    pub annotations: Vec<Annotation>,
    /// Regions handed to the classifier, including ones that failed
    pub glyph_count: usize,
    pub skipped: usize,
}
