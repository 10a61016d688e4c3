//! Climate-station heatmap renderer.
//!
//! Reads a station observation file, arranges it as a year × day-of-year
//! matrix, repairs and smooths it, and writes a color-binned PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use climate_common::{PaletteTable, PipelineOptions};
use station_parser::{Element, Granularity};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use heatmap::{render_file, write_heatmap, HeatmapConfig, InputFormat};

#[derive(Parser, Debug)]
#[command(name = "heatmap")]
#[command(about = "Render climate-station calendar heatmaps")]
struct Cli {
    /// Configuration file path (defaults to HEATMAP_* environment variables)
    #[arg(short, long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides the configuration)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one observation file to PNG
    Render(RenderArgs),
    /// List the palettes in the palette table
    Palettes {
        /// Palette table (colorbrewer JSON)
        #[arg(long)]
        palettes: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Observation file
    #[arg(short, long)]
    input: PathBuf,

    /// Input format
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// USHCN station id to keep
    #[arg(long)]
    station: Option<String>,

    /// USHCN element (TMAX, TMIN, PRCP, SNOW, SNWD)
    #[arg(long, value_parser = parse_element)]
    element: Option<Element>,

    /// One column per month instead of per day
    #[arg(long)]
    monthly: bool,

    /// Palette table (colorbrewer JSON)
    #[arg(long)]
    palettes: Option<PathBuf>,

    /// Pipeline options file (YAML or JSON)
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long)]
    palette: Option<String>,

    /// Requested number of palette colors
    #[arg(long)]
    bins: Option<usize>,

    /// Blend strength between adjacent colors (0..=1)
    #[arg(long)]
    continuity: Option<f64>,

    /// Number of smoothing passes
    #[arg(long)]
    recursion: Option<u32>,

    /// Column that becomes the first column of the image
    #[arg(long)]
    start_index: Option<usize>,

    #[arg(long)]
    no_fill_null: bool,

    #[arg(long)]
    no_smooth_horizontal: bool,

    #[arg(long)]
    no_smooth_vertical: bool,

    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn parse_element(s: &str) -> Result<Element, String> {
    s.parse().map_err(|e: station_parser::ParserError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HeatmapConfig::from_yaml_file(path)?,
        None => HeatmapConfig::from_env(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(config.logging.max_level(), cli.json_logs || config.logging.json)?;

    match cli.command {
        Command::Render(args) => {
            apply_overrides(&mut config, &args)?;
            render(&config, &args)
        }
        Command::Palettes { palettes } => {
            if palettes.is_some() {
                config.palettes = palettes;
            }
            list_palettes(&config)
        }
    }
}

fn init_tracing(level: Level, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Layer command-line flags over the loaded configuration.
fn apply_overrides(config: &mut HeatmapConfig, args: &RenderArgs) -> Result<()> {
    if let Some(path) = &args.options {
        config.options = PipelineOptions::from_file(path)
            .with_context(|| format!("Failed to load options from {:?}", path))?;
    }
    if let Some(path) = &args.palettes {
        config.palettes = Some(path.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }

    let input = &mut config.input;
    if let Some(format) = args.format {
        input.format = format;
    }
    if let Some(station) = &args.station {
        input.station = Some(station.clone());
    }
    if let Some(element) = args.element {
        input.element = element;
    }
    if args.monthly {
        input.granularity = Granularity::Monthly;
    }

    let options = &mut config.options;
    if let Some(palette) = &args.palette {
        options.palette = palette.clone();
    }
    if let Some(bins) = args.bins {
        options.bins = bins;
    }
    if let Some(continuity) = args.continuity {
        options.continuity = continuity;
    }
    if let Some(recursion) = args.recursion {
        options.recursion = recursion;
    }
    if args.start_index.is_some() {
        options.start_index = args.start_index;
    }
    if args.no_fill_null {
        options.fill_null = false;
    }
    if args.no_smooth_horizontal {
        options.smooth_horizontal = false;
    }
    if args.no_smooth_vertical {
        options.smooth_vertical = false;
    }

    config.validate()
}

fn render(config: &HeatmapConfig, args: &RenderArgs) -> Result<()> {
    let palettes = load_palettes(config)?;

    info!(input = %args.input.display(), palette = %config.options.palette, "Rendering heatmap");
    let heatmap = render_file(&args.input, config, &palettes)
        .with_context(|| format!("Failed to render {:?}", args.input))?;

    let path = write_heatmap(&heatmap, &config.output_dir)
        .with_context(|| format!("Failed to write heatmap to {:?}", config.output_dir))?;
    println!("{}", path.display());
    Ok(())
}

fn list_palettes(config: &HeatmapConfig) -> Result<()> {
    let palettes = load_palettes(config)?;
    for name in palettes.names() {
        let counts = palettes.counts(name).unwrap_or_default();
        let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
        println!("{name}: {}", counts.join(", "));
    }
    Ok(())
}

fn load_palettes(config: &HeatmapConfig) -> Result<PaletteTable> {
    let path = config.palettes_path()?;
    let table = PaletteTable::from_file(path)
        .with_context(|| format!("Failed to load palette table from {:?}", path))?;
    info!(palettes = table.names().len(), "Loaded palette table");
    Ok(table)
}
