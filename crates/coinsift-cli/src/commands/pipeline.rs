use coinsift_core::Interval;
use coinsift_features::FeatureEngine;
use coinsift_screen::ScreeningEngine;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output;

use super::{skip_warnings, CommandContext, CommandResult};

/// Feature-stage fan-in is bounded by how many symbols survive screening.
const DEFAULT_TOP_K: usize = 10;

pub async fn run(args: &RunArgs, ctx: &CommandContext) -> Result<CommandResult, CliError> {
    let interval: Interval = args.series.interval.parse()?;
    if args.series.lookback == 0 {
        return Err(CliError::Command(String::from(
            "lookback must be at least 1",
        )));
    }

    let feature_engine = FeatureEngine::new(super::feature_config(&args.windows))?;

    let mut screen_cfg = super::screen_config(&args.filters, ctx.retry);
    screen_cfg.top_k = Some(args.filters.top_k.unwrap_or(DEFAULT_TOP_K));

    let screener = ScreeningEngine::new(ctx.source.clone(), screen_cfg)?;
    let report = screener.run().await?;
    eprintln!(
        "✓ {} qualifying symbols (of {} evaluated)",
        report.results.len(),
        report.evaluated
    );

    let screen_artifact = output::write_screen_csv(&ctx.out_dir, &report)?;
    let warnings = skip_warnings(&report);

    let mut feature_artifacts = Vec::new();
    let mut errors = Vec::new();
    for result in &report.results {
        let symbol = result.symbol.clone();
        match super::derive_symbol(ctx, &feature_engine, symbol, interval, args.series.lookback)
            .await
        {
            Ok(matrix) => {
                feature_artifacts.push(output::write_features_csv(&ctx.out_dir, &matrix)?);
            }
            Err(issue) => errors.push(issue),
        }
    }

    let data = serde_json::json!({
        "evaluated": report.evaluated,
        "qualifying": report.results,
        "processed": feature_artifacts.len(),
        "screen_artifact": screen_artifact,
        "feature_artifacts": feature_artifacts,
    });

    Ok(CommandResult::ok(data)
        .with_warnings(warnings)
        .with_errors(errors))
}
