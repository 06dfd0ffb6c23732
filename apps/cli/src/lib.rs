//! # Tally Console Library
//!
//! Startup, the interactive menu and the one-shot subcommands.
//!
//! ## Module Organization
//! ```text
//! tally_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap definitions
//! ├── config.rs       ◄─── tally.toml + environment
//! ├── commands.rs     ◄─── list / search / report / export / import
//! ├── menu.rs         ◄─── numbered interactive menu
//! ├── render.rs       ◄─── tables and report text
//! └── error.rs        ◄─── AppError for startup and subcommands
//! ```
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Load configuration (file, environment, `--data-file`)
//! 3. Initialize tracing to stderr
//! 4. Open the inventory (loads the backing file)
//! 5. Run the menu or the subcommand
//! 6. Close the inventory (final save)

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod render;

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tally_store::Inventory;

use cli::Cli;
use config::AppConfig;
use error::AppResult;
use menu::Menu;

/// Runs the `tally` binary and maps the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match run_with(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tally failed");
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn run_with(cli: Cli) -> AppResult<()> {
    let mut config = AppConfig::load(cli.config)?;
    if let Some(path) = cli.data_file {
        config.storage.data_file = path;
    }
    init_tracing(&config.logging.filter);

    info!(
        data_file = %config.storage.data_file.display(),
        "Starting tally"
    );
    let mut store = Inventory::open(config.store_config())?;

    let stdout = io::stdout();
    match cli.command {
        Some(command) => {
            let mut out = stdout.lock();
            commands::execute(&mut store, command, &mut out)?;
            out.flush()?;
            store.close()?;
        }
        None => {
            Menu::new(&mut store, io::stdin().lock(), stdout.lock()).run()?;
            store.close()?;
            println!("Thank you for using the Professional Inventory Management System!");
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over the configured filter; a filter that fails to parse
/// falls back to `warn`.
fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Ignore a second init (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
