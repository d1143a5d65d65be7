use image::{DynamicImage, GrayImage};
use std::path::{Path, PathBuf};
use anyhow::Result;

/// Tunables for every stage of the recognition pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Side of the Gaussian kernel applied before thresholding (odd)
    pub blur_kernel: u32,
    pub blur_sigma: f32,

    /// Chebyshev radius of the dilation element (1 = 3x3)
    pub dilation_radius: u8,

    /// Contours enclosing less than this many square pixels are noise
    pub min_contour_area: f64,

    /// Black border added around every glyph after squaring
    pub margin: u32,

    /// Polygon approximation tolerance as a fraction of the contour perimeter
    pub approx_epsilon_ratio: f64,

    /// Fixed threshold for the whole-frame fallback glyph
    pub fallback_threshold: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            blur_sigma: 1.0,
            dilation_radius: 1,
            min_contour_area: 50.0,
            margin: 20,
            approx_epsilon_ratio: 0.02,
            fallback_threshold: 127,
        }
    }
}

impl PipelineConfig {
    pub fn with_min_contour_area(mut self, area: f64) -> Self {
        self.min_contour_area = area;
        self
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_blur(mut self, kernel: u32, sigma: f32) -> Self {
        self.blur_kernel = kernel;
        self.blur_sigma = sigma;
        self
    }

    pub fn with_dilation_radius(mut self, radius: u8) -> Self {
        self.dilation_radius = radius;
        self
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    fn save(&self, stage_dir: &str, index: usize, image: &DynamicImage) -> Result<PathBuf> {
        let dir = self.output_dir.join(stage_dir);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{:02}.png", index + 1));
        image
            .save(&path)
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
        Ok(path)
    }
}

/// Per-run context shared by all stages
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    pub fn with_debug(output_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            debug: Some(DebugConfig::new(output_dir.as_ref().to_path_buf())?),
        })
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.is_some()
    }

    /// Dump the decoded input as `00_input/01.png`
    pub fn dump_input(&self, image: &DynamicImage) {
        self.dump("00_input", 0, image);
    }

    /// Dump the binary mask as `01_mask/01.png`
    pub fn dump_mask(&self, mask: &GrayImage) {
        if !self.debug_enabled() {
            return;
        }
        self.dump("01_mask", 0, &DynamicImage::ImageLuma8(mask.clone()));
    }

    /// Dump one glyph patch as `02_glyphs/NN.png`, numbered in reading order
    pub fn dump_glyph(&self, index: usize, glyph: &GrayImage) {
        if !self.debug_enabled() {
            return;
        }
        self.dump("02_glyphs", index, &DynamicImage::ImageLuma8(glyph.clone()));
    }

    // Debug output never changes the result; failures are only reported.
    fn dump(&self, stage_dir: &str, index: usize, image: &DynamicImage) {
        let Some(debug) = &self.debug else {
            return;
        };
        match debug.save(stage_dir, index, image) {
            Ok(path) => tracing::debug!("saved {}", path.display()),
            Err(err) => tracing::warn!("debug dump for {} failed: {}", stage_dir, err),
        }
    }
}
