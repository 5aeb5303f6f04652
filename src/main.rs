//! number-progress demo
//!
//! Animates a number progress bar on a timer in the terminal, resetting it
//! with a toast each time it reaches max.

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use number_progress::config::{self, Config};
use number_progress::core::{spawn_ticker, AppCore, Tick};
use number_progress::frontend::{run_event_loop, Frontend, TuiFrontend};
use number_progress::frontend::tui::progress_bar::render_to_lines;
use number_progress::widget_state::WidgetState;
use number_progress::widgets::ProgressChange;
use number_progress::ProgressBarView;
use std::path::PathBuf;
use std::time::Duration;

#[derive(ClapParser)]
#[command(name = "number-progress")]
#[command(about = "Animated number progress bar demo", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.number-progress)
    /// Can also be set via NUMBER_PROGRESS_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Start from the configured progress instead of the saved state
    #[arg(long)]
    no_restore: bool,

    /// Override the tick interval in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    ValidateConfig {
        /// Config file to validate (default: the one in the data directory)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Render a single frame to stdout
    Snapshot {
        #[arg(long, default_value_t = 40)]
        width: u16,
        #[arg(long, default_value_t = 3)]
        height: u16,
        /// Progress to draw (default: the configured progress)
        #[arg(long)]
        progress: Option<i32>,
    },
}

fn main() -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    // (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("number-progress.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    if let Some(Commands::ValidateConfig { file }) = &cli.command {
        return validate_config(file.as_deref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    if let Some(interval) = cli.interval_ms {
        if interval == 0 {
            bail!("--interval-ms must be greater than zero");
        }
        config.demo.tick_interval_ms = interval;
    }

    match cli.command {
        Some(Commands::Snapshot {
            width,
            height,
            progress,
        }) => snapshot(config, width, height, progress),
        Some(Commands::ValidateConfig { .. }) => Ok(()),
        None => run_tui(config, !cli.no_restore),
    }
}

fn validate_config(file: Option<&std::path::Path>) -> Result<()> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    println!("Validating config file: {:?}", path);

    let contents =
        std::fs::read_to_string(&path).context(format!("Failed to read config file: {:?}", path))?;
    let config = match Config::parse(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to parse config: {:#}", e);
            std::process::exit(1);
        }
    };
    println!("✓ Config parsed successfully");

    let result = config.validate();
    for error in result.errors() {
        eprintln!("✗ Error: {}", error.message());
    }
    for warning in result.warnings() {
        println!("⚠ Warning: {}", warning.message());
    }

    if result.issues.is_empty() {
        println!("✓ Config is valid with no issues");
    }
    if result.has_errors() {
        eprintln!("\n✗ Found {} error(s)", result.errors().len());
        std::process::exit(1);
    }
    Ok(())
}

fn snapshot(config: Config, width: u16, height: u16, progress: Option<i32>) -> Result<()> {
    let mut core = AppCore::new(config);
    if let Some(progress) = progress {
        if progress < 0 || progress > core.bar.max() {
            bail!("--progress must be within 0..={}", core.bar.max());
        }
        core.bar.set_progress(progress);
    }

    let view = ProgressBarView::from_layout(&core.bar, &core.config.layout);
    for line in render_to_lines(&view, width, height) {
        println!("{}", line);
    }
    Ok(())
}

/// Run TUI frontend
fn run_tui(config: Config, restore: bool) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_tui(config, restore))
}

/// Async TUI main loop
async fn async_run_tui(config: Config, restore: bool) -> Result<()> {
    use tokio::sync::mpsc;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel::<Tick>();
    let (change_tx, mut change_rx) = mpsc::unbounded_channel::<ProgressChange>();

    let state_path = Config::state_path()?;
    let restore = restore && config.demo.restore_state;
    let start_delay = Duration::from_millis(config.demo.start_delay_ms);
    let period = Duration::from_millis(config.demo.tick_interval_ms);

    let mut app_core = AppCore::new(config);
    app_core.attach_listener(change_tx);

    if restore {
        match WidgetState::load(&state_path).and_then(|state| app_core.restore(&state)) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("No saved progress bar to restore"),
            Err(e) => tracing::warn!("Failed to restore widget state: {:#}", e),
        }
    }

    let mut frontend = TuiFrontend::new()?;
    let (width, height) = frontend.size();
    tracing::info!(width, height, "Starting demo");

    let ticker = spawn_ticker(start_delay, period, tick_tx);

    // Terminal is restored and progress saved even if the loop fails
    let result = run_event_loop(&mut frontend, &mut app_core, &mut tick_rx, &mut change_rx);

    ticker.abort();
    let _ = ticker.await;

    if let Err(e) = app_core.snapshot().save(&state_path) {
        tracing::warn!("Failed to save widget state: {:#}", e);
    }

    tracing::info!(ticks = app_core.ticks, "Demo finished");
    result
}
