//! Binary entrypoint for the thumbnailer.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use thumbnailer::config::{Configuration, Mode};
use thumbnailer::generator::Generator;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(
    name = "thumbnailer",
    about = "Replace images with full-size and thumbnail PNG derivatives"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to process (overrides `dir`)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Thumbnail bounding box edge in pixels (overrides `max-size`)
    #[arg(long, value_name = "PX")]
    max_size: Option<u32>,

    /// Derivative extension, e.g. png or webp (overrides `output-ext`)
    #[arg(long, value_name = "EXT")]
    output_ext: Option<String>,

    /// Thumbnails only, keep originals, purge `thumb.thumb` leftovers
    #[arg(long)]
    legacy: bool,

    /// Print what would be processed and exit
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("thumbnailer={level}").parse()?)
        .add_directive("fast_image_resize=warn".parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(dir) = &cli.dir {
        cfg.dir = dir.clone();
    }
    if let Some(max_size) = cli.max_size {
        cfg.max_size = max_size;
    }
    if let Some(ext) = &cli.output_ext {
        cfg.output_ext = ext.clone();
    }
    if cli.legacy {
        cfg.mode = Mode::Legacy;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = load_config(&cli)?;
    let generator = Generator::new(cfg).context("validating configuration")?;

    if cli.dry_run {
        let plan = generator.plan()?;
        for path in &plan.originals {
            println!("process {}", path.display());
        }
        if generator.config().mode == Mode::Legacy {
            for path in &plan.strays {
                println!("delete  {}", path.display());
            }
        }
        info!(
            originals = plan.originals.len(),
            derivatives = plan.derivatives.len(),
            "dry run; nothing changed"
        );
        return Ok(());
    }

    let report = generator
        .run()
        .with_context(|| format!("processing {}", generator.config().dir.display()))?;
    info!(
        processed = report.processed.len(),
        strays_removed = report.strays_removed.len(),
        "done"
    );
    Ok(())
}
