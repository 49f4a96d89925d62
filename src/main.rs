use clap::{Parser, Subcommand};
use simple_crop::config::{self, EditorConfig};
use simple_crop::crop::constraint::parse_pair;
use simple_crop::crop::{
    ConstraintMode, CustomDimensions, CustomUnit, DisplayGeometry, InputEvent, NamedRatio,
};
use simple_crop::imaging::{
    self, Dimensions, EncodeParams, ExportFormat, Quality, RasterBackend, RustBackend,
};
use simple_crop::output;
use simple_crop::session::CropSession;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Longest display edge used when `--display` is not given.
const DEFAULT_DISPLAY_EDGE: u32 = 1000;

#[derive(Parser)]
#[command(name = "simple-crop")]
#[command(about = "Constraint-aware image cropping")]
#[command(long_about = "\
Constraint-aware image cropping

The crop rectangle lives in display space: the image is laid out in a
display box (--display, default: fit within 1000px) and the rectangle is
initialized and edited there. On commit it is projected back onto the
source pixels.

Ratios:
  free, 16:9, 4:3, 3:2, 1:1, 2:3, 3:4, 9:16
  --custom-ratio 21:9     any other ratio
  --pixels 1920x1080      exact output size (region is stretched to fit)

Event scripts (--events) are JSON arrays of input events, e.g.:

  [
    {\"type\": \"pointer_down\", \"client_x\": 500, \"client_y\": 400},
    {\"type\": \"pointer_move\", \"client_x\": 560, \"client_y\": 420},
    {\"type\": \"pointer_up\"},
    {\"type\": \"wheel\", \"delta_y\": -1, \"modifier\": true}
  ]

Run 'simple-crop gen-config' to generate a documented simple-crop.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./simple-crop.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct CropArgs {
    /// Source image
    input: PathBuf,

    /// Output file (.png, .jpg, .webp)
    #[arg(short, long)]
    output: PathBuf,

    /// Display box size, WxH
    #[arg(long, value_parser = parse_dimensions)]
    display: Option<Dimensions>,

    /// Named ratio (e.g. 16:9) or "free"
    #[arg(long, conflicts_with_all = ["custom_ratio", "pixels"])]
    ratio: Option<String>,

    /// Custom ratio, W:H
    #[arg(long, value_parser = parse_dimensions, conflicts_with = "pixels")]
    custom_ratio: Option<Dimensions>,

    /// Exact output size in pixels, WxH
    #[arg(long, value_parser = parse_dimensions)]
    pixels: Option<Dimensions>,

    /// JSON file of input events to replay before committing
    #[arg(long)]
    events: Option<PathBuf>,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Source image
    input: PathBuf,

    /// Output file (.png, .jpg, .webp)
    #[arg(short, long)]
    output: PathBuf,

    /// Target width; height follows the aspect ratio unless given
    #[arg(long, required_unless_present = "height")]
    width: Option<u32>,

    /// Target height; width follows the aspect ratio unless given
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Print dimensions, format and file size
    Info {
        /// Image to inspect
        input: PathBuf,
    },
    /// Crop an image, optionally replaying an event script
    Crop(CropArgs),
    /// Resample the whole image
    Resize(ResizeArgs),
    /// Print a stock simple-crop.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Info { input } => {
            let info = imaging::identify(&input)?;
            output::print_info(&input, &info);
        }
        Command::Crop(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_crop(&args, &config)?;
        }
        Command::Resize(args) => {
            let config = load_config(cli.config.as_deref())?;
            let backend = RustBackend::open(&args.input)?;
            let source = backend.dimensions();
            let target = imaging::fit_dimensions(source, args.width, args.height);
            let buffer =
                imaging::resize_image(&backend, target.width, target.height, config.export.filter)?;
            imaging::save_buffer(&buffer, &args.output, &encode_params(&args.output, &config))?;
            output::print_resize(&args.input, &args.output, source, buffer.dimensions());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// An explicit `--config` must exist; the default file is optional.
fn load_config(path: Option<&Path>) -> Result<EditorConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(config::DEFAULT_CONFIG_FILE)),
    }
}

fn run_crop(args: &CropArgs, config: &EditorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = RustBackend::open(&args.input)?;
    let display = args
        .display
        .unwrap_or_else(|| fit_display(backend.dimensions(), DEFAULT_DISPLAY_EDGE));

    let mut session = CropSession::new(config);
    session.handle(&InputEvent::Layout {
        geometry: DisplayGeometry::sized(display.width as f64, display.height as f64),
    });
    session.load_image(backend);

    for event in mode_events(args)? {
        session.handle(&event);
    }

    if let Some(path) = &args.events {
        let script = std::fs::read_to_string(path)?;
        let events: Vec<InputEvent> = serde_json::from_str(&script)?;
        debug!(count = events.len(), "replaying event script");
        for event in &events {
            session.handle(event);
        }
    }

    let snapshot = session.state().clone();
    let params = encode_params(&args.output, config);
    let mut saved = None;
    session.commit(|buffer, size| {
        saved = Some((imaging::save_buffer(&buffer, &args.output, &params), size));
    })?;

    if let Some((result, size)) = saved {
        result?;
        output::print_crop(&args.input, &args.output, &snapshot, size);
    }
    Ok(())
}

/// Events that select the constraint requested on the command line.
fn mode_events(args: &CropArgs) -> Result<Vec<InputEvent>, String> {
    let custom = |dims: Dimensions, unit| InputEvent::SetCustom {
        custom: CustomDimensions::new(dims.width, dims.height, unit),
    };
    let locked = |mode| {
        vec![
            InputEvent::SetMode { mode },
            InputEvent::SetLock { enabled: true },
        ]
    };

    let events = if let Some(dims) = args.pixels {
        let mut events = vec![custom(dims, CustomUnit::Pixels)];
        events.extend(locked(ConstraintMode::PixelTarget {
            width: dims.width,
            height: dims.height,
        }));
        events
    } else if let Some(dims) = args.custom_ratio {
        let mut events = vec![custom(dims, CustomUnit::Ratio)];
        events.extend(locked(ConstraintMode::CustomRatio {
            width: dims.width,
            height: dims.height,
        }));
        events
    } else if let Some(ratio) = &args.ratio {
        if ratio.eq_ignore_ascii_case("free") {
            vec![InputEvent::SetMode {
                mode: ConstraintMode::Free,
            }]
        } else {
            locked(ConstraintMode::NamedRatio(ratio.parse::<NamedRatio>()?))
        }
    } else {
        Vec::new()
    };
    Ok(events)
}

fn encode_params(output: &Path, config: &EditorConfig) -> EncodeParams {
    EncodeParams {
        format: ExportFormat::from_path(output).unwrap_or(config.export.format),
        quality: Quality::new(config.export.quality),
    }
}

/// Scale `source` so its longer edge is at most `edge`.
fn fit_display(source: Dimensions, edge: u32) -> Dimensions {
    if source.width.max(source.height) <= edge {
        source
    } else if source.width >= source.height {
        imaging::fit_dimensions(source, Some(edge), None)
    } else {
        imaging::fit_dimensions(source, None, Some(edge))
    }
}

fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    parse_pair(s)
        .map(|(width, height)| Dimensions { width, height })
        .ok_or_else(|| format!("expected WxH or W:H with positive numbers, got {s:?}"))
}
