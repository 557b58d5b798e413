use coinsift_screen::ScreeningEngine;

use crate::cli::ScreenArgs;
use crate::error::CliError;
use crate::output;

use super::{skip_warnings, CommandContext, CommandResult};

pub async fn run(args: &ScreenArgs, ctx: &CommandContext) -> Result<CommandResult, CliError> {
    let config = super::screen_config(&args.filters, ctx.retry);
    let engine = ScreeningEngine::new(ctx.source.clone(), config)?;
    let report = engine.run().await?;

    let artifact = output::write_screen_csv(&ctx.out_dir, &report)?;
    let warnings = skip_warnings(&report);

    let data = serde_json::json!({
        "qualifying": report.results,
        "evaluated": report.evaluated,
        "skipped": report.skips.len(),
        "artifact": artifact,
    });

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
