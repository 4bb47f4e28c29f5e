//! Salvage command implementation.

use crate::cli::SalvageArgs;
use crate::error::Result;
use crate::output::Formatter;
use ledgerline_domain::Transaction;
use ledgerline_extractor::{salvage_transactions, Deduplicator};
use std::io::Read;
use tracing::info;

/// Execute the salvage command.
pub fn execute_salvage(args: SalvageArgs, formatter: &Formatter) -> Result<()> {
    let response = match &args.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let transactions = salvage(&response);
    println!("{}", formatter.format_transactions(&transactions)?);
    Ok(())
}

/// Salvage, normalize and de-duplicate one response.
pub fn salvage(response: &str) -> Vec<Transaction> {
    let (strategy, rows) = salvage_transactions(response);
    match strategy {
        Some(strategy) => info!("Recovered {} record(s) via {}", rows.len(), strategy),
        None => info!("No recoverable records"),
    }
    Deduplicator::new().dedup(rows)
}
