use handdigits::{DigitPipeline, PipelineConfig, PipelineContext};
use image::ImageReader;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <image_path> [debug_dir]", args[0]);
        std::process::exit(1);
    }

    let img = ImageReader::open(&args[1])?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    println!("Loaded image: {}x{}", img.width(), img.height());

    let debug_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("debug_segments"));
    let pipeline = DigitPipeline::new(PipelineConfig::default())
        .with_context(PipelineContext::with_debug(&debug_dir)?);

    let segmentation = pipeline.segment_image(&img);
    println!(
        "Mask foreground: {} px, {} glyphs{}",
        segmentation.mask.foreground_count(),
        segmentation.glyphs.len(),
        if segmentation.used_fallback { " (whole-frame fallback)" } else { "" }
    );
    for (i, glyph) in segmentation.glyphs.iter().enumerate() {
        match glyph.placement {
            Some(p) => println!("  {:02}: at ({}, {}) side {}", i + 1, p.x, p.y, p.side),
            None => println!("  {:02}: whole frame, {}x{}", i + 1, glyph.width(), glyph.height()),
        }
    }
    println!("Stage images written to {}/", debug_dir.display());

    Ok(())
}
