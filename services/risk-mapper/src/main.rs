//! Hazard risk mapper.
//!
//! Computes a composite flood/landslide risk grid from five input layers and
//! renders it with a color-scale legend. Also converts single layers to
//! images and normalizes individual grids.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use risk_mapper::config::validate_quality;
use risk_mapper::layers::convert_layers;
use risk_mapper::normalization::normalize_file;
use risk_mapper::{RiskConfig, RiskPipeline};
use risk_processor::{CsvLayout, DimensionPolicy, NormalizationMethod};

#[derive(Parser, Debug)]
#[command(name = "risk-mapper")]
#[command(about = "Flood and landslide risk maps from raster layers")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "RISK_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the risk grid, image and legend
    Risk {
        /// Configuration file path
        #[arg(short, long, env = "RISK_CONFIG")]
        config: Option<PathBuf>,

        /// Directory containing the input layers
        #[arg(long, env = "RISK_INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// Directory the artifacts are written to
        #[arg(short, long, env = "RISK_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Reject layers whose dimensions differ instead of cropping
        #[arg(long)]
        strict: bool,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
    },

    /// Render every labelled layer CSV in a directory
    Layers {
        /// Directory containing layer CSV files
        #[arg(default_value = ".")]
        input_dir: PathBuf,

        /// Directory the images are written to (defaults to the input directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// JPEG quality (1-100)
        #[arg(long, default_value_t = renderer::DEFAULT_JPEG_QUALITY)]
        quality: u8,
    },

    /// Normalize a single grid
    Normalize {
        /// Input CSV
        input: PathBuf,

        /// Output CSV
        output: PathBuf,

        /// minmax, zscore or robust
        #[arg(short, long, default_value = "minmax")]
        method: String,

        /// Input has a header row and a row-label column
        #[arg(long)]
        labelled: bool,
    },
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json);

    if let Err(e) = run(args.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Risk {
            config,
            input_dir,
            output_dir,
            strict,
            quality,
        } => {
            let mut config = RiskConfig::load(config.as_deref())?;
            if let Some(dir) = input_dir {
                config.input_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if strict {
                config.dimension_policy = DimensionPolicy::Strict;
            }
            if let Some(quality) = quality {
                config.jpeg_quality = quality;
            }
            config.validate()?;

            run_risk(config)
        }
        Command::Layers {
            input_dir,
            output_dir,
            quality,
        } => {
            validate_quality(quality)?;
            let output_dir = output_dir.unwrap_or_else(|| input_dir.clone());
            let report = convert_layers(&input_dir, &output_dir, quality)
                .context("Layer conversion failed")?;
            for (file, summary) in &report.converted {
                info!(file = %file, jpeg = %summary.jpeg_path, dimensions = %summary.dimensions, "Layer image");
            }
            Ok(())
        }
        Command::Normalize {
            input,
            output,
            method,
            labelled,
        } => {
            let method: NormalizationMethod = method.parse()?;
            let layout = if labelled {
                CsvLayout::labelled()
            } else {
                CsvLayout::bare()
            };
            let report = normalize_file(&input, &output, layout, method)
                .with_context(|| format!("Failed to normalize {:?}", input))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn run_risk(config: RiskConfig) -> Result<()> {
    info!("Starting risk computation");
    let pipeline = RiskPipeline::new(config);
    let outcome = pipeline.run()?;

    if let Some(stats) = &outcome.stats {
        info!(
            dimensions = %outcome.risk.dimensions_label(),
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            no_data = stats.sentinel_count,
            "Risk summary"
        );
    }

    let artifacts = outcome.render.with_context(|| {
        format!(
            "Risk grid saved to {:?} but rendering did not complete",
            outcome.csv_path
        )
    })?;
    info!(
        csv = %outcome.csv_path.display(),
        jpeg = %artifacts.jpeg_path.display(),
        legend = %artifacts.legend_path.display(),
        "Risk map complete"
    );
    Ok(())
}
