//! Loading Dots - terminal demo of the pulsing dots loading indicator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loading_dots::config::{AppConfig, DotAttributes};
use loading_dots::frontend::TuiFrontend;
use loading_dots::{LoadingDots, TokioAnimator};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "loading-dots")]
#[command(about = "Pulsing dots loading indicator", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of dots (overrides numCircles)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    num_circles: Option<i64>,

    /// Cycle length in milliseconds (overrides animationDuration)
    #[arg(short, long, allow_negative_numbers = true)]
    duration: Option<i64>,

    /// Dot color, #RRGGBB / #AARRGGBB or a color name (overrides circleColor)
    #[arg(long)]
    color: Option<String>,

    /// Log file (use RUST_LOG env var to control level)
    #[arg(long, value_name = "FILE", default_value = "loading-dots.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn overrides(&self) -> DotAttributes {
        DotAttributes {
            num_circles: self.num_circles,
            animation_duration: self.duration,
            circle_color: self.color.clone(),
            interpolator: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and print the effective settings
    CheckConfig,
}

fn init_logging(path: &Path) -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();
    Ok(())
}

fn check_config(app_config: &AppConfig, attrs: &DotAttributes) {
    let dots = loading_dots::DotsConfig::default().with_attributes(attrs);
    println!("numCircles        = {}", dots.dot_count());
    println!("animationDuration = {}ms", dots.cycle_duration_ms());
    println!("circleColor       = {}", dots.dot_color().to_hex());
    println!("interpolator      = {:?}", dots.interpolator());
    println!(
        "start delays      = {:?}",
        (0..dots.dot_count())
            .map(|i| dots.start_delay_ms(i))
            .collect::<Vec<_>>()
    );
    println!("frame interval    = {}ms", app_config.tui.frame_interval_ms);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let app_config = AppConfig::load(cli.config.as_deref())?;
    let attrs = app_config.dots.merged(&cli.overrides());

    if let Some(Commands::CheckConfig) = cli.command {
        check_config(&app_config, &attrs);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to start animation runtime")?;

    let animator = Arc::new(TokioAnimator::new(
        runtime.handle().clone(),
        app_config.tui.frame_interval(),
    ));

    let dirty = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&dirty);
    let mut dots = LoadingDots::new(
        animator,
        Arc::new(move || flag.store(true, Ordering::Release)),
        Some(&attrs),
    )?;

    tracing::info!(
        "Starting loading dots demo: {} dots, {}ms cycle",
        dots.config().dot_count(),
        dots.config().cycle_duration_ms()
    );

    let mut frontend = TuiFrontend::new(app_config.tui.clone())?;
    let result = frontend.run(&mut dots, &dirty);

    dots.teardown();
    frontend.cleanup()?;
    tracing::info!("Loading dots demo exited");

    result
}
