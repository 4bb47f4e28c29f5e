//! Text command implementation.

use crate::cli::TextArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ledgerline_layout::{system_extractor, DocumentSource};

/// Execute the text command.
pub async fn execute_text(args: TextArgs, config: Config, formatter: &Formatter) -> Result<()> {
    if !args.file.exists() {
        return Err(CliError::InvalidInput(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    let document = system_extractor(config.layout)?;
    let path = args.file;
    let text = tokio::task::spawn_blocking(move || document.extract(&path)).await??;

    println!("{}", formatter.format_document(&text));
    Ok(())
}
