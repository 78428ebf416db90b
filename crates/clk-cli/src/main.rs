use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clk_cli::commands::{add, clock, edit, history, resolve, rm, stats, status, watch};
use clk_cli::notifier::DesktopNotifier;
use clk_cli::{Cli, Commands, Config};
use clk_engine::{Notifier, NullNotifier, Settings, Tracker};
use clk_store::Store;

/// Load config and open the lifecycle engine around the data file.
///
/// The engine instance is constructed once per invocation and passed down to
/// the command; nothing holds process-wide shared state.
fn open_tracker(
    config_path: Option<&Path>,
    notifier: Arc<dyn Notifier>,
) -> Result<(Tracker, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let store = Store::new(&config.data_path);
    let settings: Settings = config.settings();
    let tracker = Tracker::open(store, notifier, settings);
    Ok((tracker, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = std::io::stdout();
    match &cli.command {
        Some(Commands::ClockIn) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(DesktopNotifier::new(false)))?;
            clock::clock_in(&mut stdout, &mut tracker, &Local)?;
        }
        Some(Commands::ClockOut) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(DesktopNotifier::new(false)))?;
            clock::clock_out(&mut stdout, &mut tracker, &Local)?;
        }
        Some(Commands::Toggle) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(DesktopNotifier::new(false)))?;
            clock::toggle(&mut stdout, &mut tracker, &Local)?;
        }
        Some(Commands::Status) => {
            let (tracker, config) = open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            status::run(&mut stdout, &tracker, Utc::now(), &Local)?;
            writeln!(stdout, "Data file: {}", config.data_path.display())?;
        }
        Some(Commands::Add {
            clock_in,
            clock_out,
        }) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            add::run(&mut stdout, &mut tracker, clock_in, clock_out)?;
        }
        Some(Commands::Edit {
            id,
            clock_in,
            clock_out,
        }) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            edit::run(&mut stdout, &mut tracker, id, clock_in, clock_out)?;
        }
        Some(Commands::Rm { ids }) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            rm::run(&mut stdout, &mut tracker, ids)?;
        }
        Some(Commands::History { json }) => {
            let (tracker, _config) = open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            history::run(&mut stdout, tracker.data(), *json, &Local)?;
        }
        Some(Commands::Stats { months, json }) => {
            let (tracker, _config) = open_tracker(cli.config.as_deref(), Arc::new(NullNotifier))?;
            stats::run(&mut stdout, tracker.data(), *months, *json, Utc::now(), &Local)?;
        }
        Some(Commands::Resolve { complete, discard }) => {
            let (mut tracker, _config) =
                open_tracker(cli.config.as_deref(), Arc::new(DesktopNotifier::new(false)))?;
            resolve::run(&mut stdout, &mut tracker, complete.as_deref(), *discard)?;
        }
        Some(Commands::Watch) => {
            let (mut tracker, config) =
                open_tracker(cli.config.as_deref(), Arc::new(DesktopNotifier::new(true)))?;
            watch::run(&mut stdout, &mut tracker, &config.data_path)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
