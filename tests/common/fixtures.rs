use handdigits::{ClassDistribution, DigitClassifier, NormalizedPatch, RecognitionError};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::sync::Mutex;

pub const PAPER: u8 = 255;
pub const INK: u8 = 0;

/// Draws a blocky "3": three bars joined by a right-hand stroke.
pub fn draw_three(img: &mut GrayImage, x: i32, y: i32, ink: u8) {
    let color = Luma([ink]);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(30, 6), color);
    draw_filled_rect_mut(img, Rect::at(x, y + 27).of_size(30, 6), color);
    draw_filled_rect_mut(img, Rect::at(x, y + 54).of_size(30, 6), color);
    draw_filled_rect_mut(img, Rect::at(x + 24, y).of_size(6, 60), color);
}

/// Draws a blocky "7": top bar and a right-hand stroke.
pub fn draw_seven(img: &mut GrayImage, x: i32, y: i32, ink: u8) {
    let color = Luma([ink]);
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(30, 6), color);
    draw_filled_rect_mut(img, Rect::at(x + 24, y).of_size(6, 60), color);
}

/// Draws a blocky "1": a single upright bar.
pub fn draw_one(img: &mut GrayImage, x: i32, y: i32, ink: u8) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(6, 60), Luma([ink]));
}

/// 200x100 paper with a "3" on the left and a "7" on the right.
///
/// The "7" sits higher so contour discovery meets it first.
pub fn three_seven_gray(paper: u8, ink: u8) -> GrayImage {
    let mut img = GrayImage::from_pixel(200, 100, Luma([paper]));
    draw_three(&mut img, 30, 25, ink);
    draw_seven(&mut img, 120, 10, ink);
    img
}

/// Same scene as [`three_seven_gray`], as a color photo would arrive.
pub fn three_seven_photo() -> DynamicImage {
    let gray = three_seven_gray(PAPER, INK);
    let rgb = RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v.saturating_sub(10)])
    });
    DynamicImage::ImageRgb8(rgb)
}

/// Three digits "3", "1", "7" left to right.
pub fn three_one_seven() -> DynamicImage {
    let mut img = GrayImage::from_pixel(300, 100, Luma([PAPER]));
    draw_three(&mut img, 30, 20, INK);
    draw_one(&mut img, 140, 20, INK);
    draw_seven(&mut img, 230, 20, INK);
    DynamicImage::ImageLuma8(img)
}

pub fn blank_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([PAPER])))
}

/// Returns labels in call order; `None` entries fail that call.
pub struct ScriptedClassifier {
    script: Vec<Option<char>>,
    calls: Mutex<usize>,
    pub confidence: f32,
}

impl ScriptedClassifier {
    pub fn new(script: &[Option<char>]) -> Self {
        Self {
            script: script.to_vec(),
            calls: Mutex::new(0),
            confidence: 0.8,
        }
    }

    pub fn labels(labels: &str) -> Self {
        Self::new(&labels.chars().map(Some).collect::<Vec<_>>())
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl DigitClassifier for ScriptedClassifier {
    fn classify(&self, _patch: &NormalizedPatch) -> Result<ClassDistribution, RecognitionError> {
        let mut calls = self.calls.lock().unwrap();
        let step = *calls;
        *calls += 1;

        let label = self
            .script
            .get(step)
            .copied()
            .flatten()
            .ok_or_else(|| RecognitionError::Inference(format!("scripted failure on call {}", step)))?;
        let digit = label.to_digit(10).unwrap() as usize;

        let rest = (1.0 - self.confidence) / 9.0;
        let mut probs = [rest; 10];
        probs[digit] = self.confidence;
        ClassDistribution::from_probabilities(&probs)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Picks a digit from how much ink the patch holds; same patch, same answer.
pub struct InkClassifier;

impl DigitClassifier for InkClassifier {
    fn classify(&self, patch: &NormalizedPatch) -> Result<ClassDistribution, RecognitionError> {
        let ink = patch.mean_intensity();
        let digit = ((ink * 97.0) as usize) % 10;
        let mut logits = [0.0f32; 10];
        logits[digit] = 1.0 + ink * 4.0;
        ClassDistribution::from_logits(&logits)
    }

    fn name(&self) -> &str {
        "ink"
    }
}

/// A model that was never loaded
pub struct UnloadedClassifier;

impl DigitClassifier for UnloadedClassifier {
    fn classify(&self, _patch: &NormalizedPatch) -> Result<ClassDistribution, RecognitionError> {
        Err(RecognitionError::ModelNotReady)
    }

    fn name(&self) -> &str {
        "unloaded"
    }

    fn is_ready(&self) -> bool {
        false
    }
}
