//! Command line definition.
//!
//! ```bash
//! # Interactive menu
//! tally
//!
//! # One-shot commands for scripts
//! tally list --json
//! tally search tech
//! tally report --json
//! tally export backup.csv
//! tally import backup.csv --clear
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DATA_FILE_ENV;

#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Inventory tracking with a CSV backing file")]
pub struct Cli {
    /// Backing file (overrides the config file)
    #[arg(long, global = true, env = DATA_FILE_ENV)]
    pub data_file: Option<PathBuf>,

    /// Config file (default: platform config dir/tally.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Run one command instead of the interactive menu
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show every item
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Find items by name, category, supplier or barcode
    Search {
        term: String,
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Show items at or below their minimum stock
    LowStock,
    /// Show items in one category
    Category { name: String },
    /// Print the analytics report
    Report {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write every item to a CSV file
    Export { path: PathBuf },
    /// Read items from a CSV file
    Import {
        path: PathBuf,
        /// Remove existing items first
        #[arg(long)]
        clear: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["tally", "report", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Command::Report { json: true }));

        let cli = Cli::try_parse_from(["tally", "import", "in.csv", "--clear"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Import {
                path: PathBuf::from("in.csv"),
                clear: true
            })
        );

        let cli = Cli::try_parse_from(["tally", "low-stock"]).unwrap();
        assert_eq!(cli.command, Some(Command::LowStock));
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["tally", "list", "--data-file", "shop.csv", "--config", "t.toml"])
                .unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("shop.csv")));
        assert_eq!(cli.config, Some(PathBuf::from("t.toml")));
    }

    #[test]
    fn test_data_file_reads_environment_variable() {
        use clap::CommandFactory;
        use std::ffi::OsStr;

        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "data_file")
            .unwrap();
        assert_eq!(arg.get_env(), Some(OsStr::new(DATA_FILE_ENV)));
    }
}
