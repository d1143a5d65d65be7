use image::imageops::invert;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::dilate;

use crate::models::BinaryMask;
use crate::pipeline::PipelineConfig;

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Normalized 1-D Gaussian taps for a fixed odd kernel size.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let half = (size / 2) as i32;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        // Same fallback OpenCV uses when sigma is not given
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let taps: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Apply a fixed-size Gaussian blur to suppress sensor noise
pub fn apply_blur(img: &GrayImage, kernel_size: u32, sigma: f32) -> GrayImage {
    let kernel = gaussian_kernel(kernel_size, sigma);
    separable_filter_equal(img, &kernel)
}

/// Otsu binarization. Pixels brighter than the level become background,
/// so dark ink on light paper comes out bright.
pub fn binarize_otsu(img: &GrayImage) -> GrayImage {
    let level = otsu_level(img);
    tracing::debug!("otsu level: {}", level);
    threshold(img, level, ThresholdType::BinaryInverted)
}

/// Number of corner pixels brighter than mid-gray
pub fn bright_corner_count(img: &GrayImage) -> usize {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return 0;
    }
    [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)]
        .iter()
        .filter(|&&(x, y)| img.get_pixel(x, y)[0] > 127)
        .count()
}

/// Flip the mask when most corners are foreground.
///
/// Corners are assumed to be background; a stroke touching a corner can
/// fool this.
pub fn correct_polarity(img: GrayImage) -> GrayImage {
    if bright_corner_count(&img) > 2 {
        tracing::debug!("background detected as foreground, inverting mask");
        let mut inverted = img;
        invert(&mut inverted);
        inverted
    } else {
        img
    }
}

/// Grow strokes by `radius` in every direction (square element)
pub fn dilate_mask(img: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return img.clone();
    }
    dilate(img, Norm::LInf, radius)
}

/// Raw image to a polarity-normalized binary mask. Never fails.
pub fn preprocess(img: &DynamicImage, config: &PipelineConfig) -> BinaryMask {
    let gray = to_grayscale(img);
    let blurred = apply_blur(&gray, config.blur_kernel, config.blur_sigma);
    let binary = binarize_otsu(&blurred);
    let oriented = correct_polarity(binary);
    let dilated = dilate_mask(&oriented, config.dilation_radius);
    BinaryMask::from_image(dilated)
}
