use std::path::PathBuf;
use std::process;

use clap::Parser;

use facecam_core::annotation::domain::frame_annotator::AnnotationStyle;
use facecam_core::detection::domain::detection_params::DetectionParams;
use facecam_core::pipeline::live_detection_use_case::{LiveDetectionUseCase, LoopConfig};
use facecam_core::pipeline::loop_state::Termination;
use facecam_core::shared::constants::{
    DEFAULT_LABEL, DEFAULT_POLL_INTERVAL_MS, DEFAULT_QUIT_KEY, DEFAULT_WINDOW_TITLE,
};

/// Real-time face detection on a webcam feed.
#[derive(Parser, Debug)]
#[command(name = "facecam")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Haar cascade XML to load instead of the bundled frontal-face model.
    #[arg(long)]
    cascade: Option<PathBuf>,

    /// Title of the preview window.
    #[arg(long, default_value = DEFAULT_WINDOW_TITLE)]
    window_title: String,

    /// Text drawn above each detected face.
    #[arg(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// Key that closes the window and exits.
    #[arg(long, default_value_t = DEFAULT_QUIT_KEY)]
    quit_key: char,

    /// Maximum wait for a key press per frame, in milliseconds (>= 1).
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_ms: i32,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(termination) => process::exit(termination.exit_code()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run() -> Result<Termination, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = loop_config(&cli);
    let style = annotation_style(&cli);
    let mut use_case = build_use_case(&cli, config, style)?;
    use_case.execute()
}

fn loop_config(cli: &Cli) -> LoopConfig {
    LoopConfig {
        device_index: cli.camera,
        window_title: cli.window_title.clone(),
        quit_key: cli.quit_key,
        poll_interval_ms: cli.poll_ms,
        detection: DetectionParams::default(),
    }
}

fn annotation_style(cli: &Cli) -> AnnotationStyle {
    AnnotationStyle {
        label: cli.label.clone(),
        ..AnnotationStyle::default()
    }
}

#[cfg(feature = "opencv")]
fn build_use_case(
    cli: &Cli,
    config: LoopConfig,
    style: AnnotationStyle,
) -> Result<LiveDetectionUseCase, Box<dyn std::error::Error>> {
    use facecam_core::annotation::infrastructure::opencv_annotator::OpenCvAnnotator;
    use facecam_core::capture::infrastructure::opencv_camera::OpenCvCamera;
    use facecam_core::detection::infrastructure::haar_cascade_detector::HaarCascadeDetector;
    use facecam_core::display::infrastructure::highgui_display::HighGuiDisplay;
    use facecam_core::pipeline::pipeline_logger::StdoutPipelineLogger;

    let cascade = resolve_cascade(cli.cascade.as_deref())?;
    let detector = HaarCascadeDetector::new(&cascade, config.detection)?;

    Ok(LiveDetectionUseCase::new(
        Box::new(OpenCvCamera::new()),
        Box::new(detector),
        Box::new(OpenCvAnnotator::new(style)),
        Box::new(HighGuiDisplay::new()),
        Box::new(StdoutPipelineLogger::default()),
        config,
    ))
}

#[cfg(not(feature = "opencv"))]
fn build_use_case(
    _cli: &Cli,
    _config: LoopConfig,
    _style: AnnotationStyle,
) -> Result<LiveDetectionUseCase, Box<dyn std::error::Error>> {
    Err("facecam was built without a capture backend; rebuild with `--features opencv`".into())
}

#[cfg(feature = "opencv")]
fn resolve_cascade(
    explicit: Option<&std::path::Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    use facecam_core::detection::infrastructure::cascade_resolver::{
        self, CascadeLookup,
    };
    use facecam_core::shared::constants::{
        BUNDLED_CASCADE_DIRS, HAAR_CASCADE_NAME, HAAR_CASCADE_URL,
    };

    log::info!("Resolving cascade: {HAAR_CASCADE_NAME}");
    let lookup = CascadeLookup {
        name: HAAR_CASCADE_NAME,
        url: HAAR_CASCADE_URL,
        explicit,
        cache_dir: cascade_resolver::cascade_cache_dir()?,
        bundled_dirs: BUNDLED_CASCADE_DIRS.iter().map(PathBuf::from).collect(),
    };

    let needs_download = explicit.is_none() && cascade_resolver::find_local(&lookup).is_none();
    let path = cascade_resolver::resolve(&lookup, Some(Box::new(download_progress)))?;
    if needs_download {
        eprintln!();
    }
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.camera < 0 {
        return Err(format!("Camera index must be non-negative, got {}", cli.camera).into());
    }
    if let Some(path) = &cli.cascade {
        if !path.is_file() {
            return Err(format!("Cascade file not found: {}", path.display()).into());
        }
    }
    if cli.poll_ms < 1 {
        return Err(format!(
            "Poll interval must be at least 1 ms, got {}",
            cli.poll_ms
        )
        .into());
    }
    if !cli.quit_key.is_ascii_graphic() {
        return Err(format!(
            "Quit key must be a printable ASCII character, got {:?}",
            cli.quit_key
        )
        .into());
    }
    if cli.label.trim().is_empty() {
        return Err("Label must not be empty".into());
    }
    Ok(())
}

#[cfg(feature = "opencv")]
fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face cascade... {pct}%");
    } else {
        eprint!("\rDownloading face cascade... {downloaded} bytes");
    }
}
