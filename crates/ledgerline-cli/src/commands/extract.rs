//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ledgerline_extractor::{Extractor, StatementPipeline};
use ledgerline_layout::system_extractor;
use ledgerline_llm::OpenAiProvider;
use tracing::debug;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, mut config: Config, formatter: &Formatter) -> Result<()> {
    config.apply_overrides(args.chunk_size, args.model)?;
    debug!(
        "chunk_size={} model={} ocr_dpi={}",
        config.extractor.chunk_size, config.llm.model, config.layout.ocr_dpi
    );

    let provider = OpenAiProvider::from_env(config.llm)?;
    let model = provider.model().to_string();
    let extractor = Extractor::new(provider, config.extractor)?.with_model_name(model);
    let pipeline = StatementPipeline::new(system_extractor(config.layout)?, extractor);

    let report = pipeline.process(&args.file).await?;
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
