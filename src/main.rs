use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use handdigits::{DigitPipeline, PipelineConfig, PipelineContext, Predictor};
use handdigits::visualize::render_annotations;

#[derive(Parser)]
#[command(name = "handdigits")]
#[command(about = "Recognize handwritten digits in a photo or scan")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Classifier weights (.rten)
    #[arg(short, long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Model architecture the weights belong to
    #[arg(long, default_value = "mlp_model")]
    arch: String,

    /// Minimum contour area in pixels; smaller blobs are noise
    #[arg(long, default_value_t = 50.0)]
    min_area: f64,

    /// Black margin around each glyph before resizing
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(..=4096))]
    margin: u32,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Write a copy of the input with recognized glyphs boxed
    #[arg(long, value_name = "PNG")]
    annotate: Option<PathBuf>,

    /// Only segment and list glyph regions; no model needed
    #[arg(long)]
    segment_only: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "handdigits=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    tracing::info!("loading image {}", args.image_path.display());
    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    let config = PipelineConfig::default()
        .with_min_contour_area(args.min_area)
        .with_margin(args.margin);
    let context = match &args.debug_out {
        Some(dir) => PipelineContext::with_debug(dir)?,
        None => PipelineContext::default(),
    };
    let pipeline = DigitPipeline::new(config).with_context(context);

    if args.segment_only {
        let segmentation = pipeline.segment_image(&img);
        let regions: Vec<_> = segmentation
            .glyphs
            .iter()
            .map(|g| {
                serde_json::json!({
                    "x": g.placement.map(|p| p.x),
                    "y": g.placement.map(|p| p.y),
                    "side": g.width(),
                })
            })
            .collect();
        let out = serde_json::json!({
            "fallback": segmentation.used_fallback,
            "regions": regions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let mut predictor = Predictor::default().with_pipeline(pipeline);
    if let Some(weights) = &args.model {
        predictor.load(&args.arch, weights)?;
    }

    let prediction = predictor.predict(&img)?;
    println!("{}", serde_json::to_string_pretty(&prediction.report)?);

    if let Some(path) = &args.annotate {
        render_annotations(&img, &prediction.annotations)
            .save(path)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;
        tracing::info!("annotated image written to {}", path.display());
    }

    Ok(())
}
