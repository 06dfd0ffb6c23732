//! One-shot subcommands.
//!
//! Each runs against an already opened store and writes to `out`; the caller
//! closes the store afterwards so mutations are saved once.

use std::io::Write;

use tally_core::now;
use tally_store::Inventory;
use tracing::info;

use crate::cli::Command;
use crate::error::AppResult;
use crate::render;

pub fn execute(store: &mut Inventory, command: Command, out: &mut impl Write) -> AppResult<()> {
    info!(?command, "Running command");

    match command {
        Command::List { json } => {
            if json {
                write_json(out, store.items())?;
            } else {
                let days = store.config().expiring_soon_days;
                render::inventory_table(out, store.items(), days, now())?;
            }
        }
        Command::Search { term, json } => {
            let found = store.search(&term);
            if json {
                write_json(out, &found)?;
            } else {
                render::search_results(out, &term, &found)?;
            }
        }
        Command::LowStock => render::low_stock(out, &store.low_stock_items())?,
        Command::Category { name } => {
            render::category(out, &name, &store.filter_by_category(&name))?
        }
        Command::Report { json } => {
            let report = store.analytics();
            if json {
                write_json(out, &report)?;
            } else {
                render::analytics(out, &report)?;
            }
        }
        Command::Export { path } => {
            let count = store.export_to(&path)?;
            writeln!(out, "Exported {count} item(s) to '{}'", path.display())?;
        }
        Command::Import { path, clear } => {
            let summary = store.import_from(&path, clear)?;
            writeln!(
                out,
                "Imported {} item(s) from '{}', {} error(s)",
                summary.imported,
                path.display(),
                summary.errors
            )?;
        }
    }

    Ok(())
}

fn write_json(out: &mut impl Write, value: &(impl serde::Serialize + ?Sized)) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
