use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use facetrack_core::detection::domain::face_detector::{DetectorVariant, FaceDetector};
use facetrack_core::detection::domain::tracker_config::TrackerConfig;
use facetrack_core::detection::infrastructure::libfacedetect_detector::LibFaceDetectDetector;
use facetrack_core::detection::infrastructure::replay_detector::ReplayDetector;
use facetrack_core::shared::constants::IMAGE_EXTENSIONS;
use facetrack_core::shared::gray_frame::GrayFrame;
use facetrack_core::tracking::face_tracker_context::FaceTrackerContext;

/// Detect faces in a single image and print them as JSON.
#[derive(Parser)]
#[command(name = "facetrack")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Detector variant: frontal, frontal-surveillance, multi-view, multi-view-reinforce.
    #[arg(long, default_value = "frontal")]
    variant: String,

    /// JSON tracker configuration; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scale factor for scan windows.
    #[arg(long)]
    scale: Option<f32>,

    /// Neighbors a candidate needs to be kept.
    #[arg(long)]
    min_neighbors: Option<u32>,

    /// Minimum face width in pixels.
    #[arg(long)]
    min_width: Option<u32>,

    /// Maximum face width in pixels (0 = unbounded).
    #[arg(long)]
    max_width: Option<u32>,

    /// Request landmark points for each face.
    #[arg(long, overrides_with = "no_landmarks")]
    landmarks: bool,

    /// Skip landmark points even if the config file enables them.
    #[arg(long, overrides_with = "landmarks")]
    no_landmarks: bool,

    /// Decode a captured result-buffer dump instead of running the native detector.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Write the effective configuration to this file.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let variant = DetectorVariant::parse(&cli.variant)
        .ok_or_else(|| format!("Unknown variant '{}'", cli.variant))?;
    let config = build_config(&cli)?;
    if let Some(path) = &cli.save_config {
        config.save(path)?;
        log::info!("Configuration written to {}", path.display());
    }

    let frame = load_gray(&cli.input)?;
    let detector = build_detector(cli.replay.as_deref())?;
    let mut context = FaceTrackerContext::with_config(detector, config);
    log::info!(
        "Running {variant} detection with {} on {}x{} image",
        context.detector_name(),
        frame.width(),
        frame.height()
    );

    let faces = context.detect(variant, &frame)?;
    log::info!("Detected {} faces", faces.len());
    println!("{}", serde_json::to_string_pretty(&*faces)?);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<TrackerConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(scale) = cli.scale {
        config.scale = scale;
    }
    if let Some(n) = cli.min_neighbors {
        config.min_neighbors = n;
    }
    if let Some(w) = cli.min_width {
        config.min_object_width = w;
    }
    if let Some(w) = cli.max_width {
        config.max_object_width = w;
    }
    if cli.landmarks {
        config.landmarks = true;
    } else if cli.no_landmarks {
        config.landmarks = false;
    }
    Ok(config)
}

fn build_detector(
    replay: Option<&Path>,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match replay {
        Some(path) => {
            log::info!("Replaying result dump {}", path.display());
            Ok(Box::new(ReplayDetector::from_file(path)?))
        }
        None => Ok(Box::new(LibFaceDetectDetector::for_host()?)),
    }
}

fn load_gray(path: &Path) -> Result<GrayFrame, Box<dyn std::error::Error>> {
    let luma = image::open(path)?.to_luma8();
    let (width, height) = luma.dimensions();
    Ok(GrayFrame::new(luma.into_raw(), width, height)?)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Input must be an image ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.input.display()
        )
        .into());
    }
    if DetectorVariant::parse(&cli.variant).is_none() {
        let names: Vec<_> = DetectorVariant::ALL.iter().map(|v| v.as_str()).collect();
        return Err(format!(
            "Variant must be one of: {}, got '{}'",
            names.join(", "),
            cli.variant
        )
        .into());
    }
    if let Some(path) = &cli.replay {
        if !path.exists() {
            return Err(format!("Replay dump not found: {}", path.display()).into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
