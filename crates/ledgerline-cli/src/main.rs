//! Ledgerline CLI - Extract transactions from bank statements.

use anyhow::Context;
use clap::Parser;
use ledgerline_cli::{commands, init_tracing, Cli, CliFormat, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match &cli.command {
        Command::Extract(args) => args.format,
        Command::Salvage(args) => args.format,
        Command::Text(_) => CliFormat::Table,
    };
    let formatter = Formatter::new(format, !cli.no_color);

    if let Err(e) = run(cli, &formatter).await {
        let message = format!("{:#}", e);
        match format {
            // JSON consumers read stdout only
            CliFormat::Json => println!("{}", formatter.format_failure(&message)),
            CliFormat::Table => eprintln!("{}", formatter.format_failure(&message)),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> anyhow::Result<()> {
    match cli.command {
        Command::Salvage(args) => commands::execute_salvage(args, formatter)?,
        Command::Extract(args) => {
            let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            commands::execute_extract(args, config, formatter).await?
        }
        Command::Text(args) => {
            let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
            commands::execute_text(args, config, formatter).await?
        }
    }

    Ok(())
}
