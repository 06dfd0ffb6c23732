//! # Tally Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              tally                                      │
//! │                                                                         │
//! │  main.rs ────► tally_cli::run()                                        │
//! │                    │                                                    │
//! │                    ├── no subcommand ──► interactive menu (stdin)      │
//! │                    └── subcommand ─────► one command, then exit        │
//! │                                                                         │
//! │  inventory_data.csv ◄──── rewritten after every change                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The setup lives in lib.rs so it can be tested.

use std::process::ExitCode;

fn main() -> ExitCode {
    tally_cli::run()
}
