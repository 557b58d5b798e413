use coinsift_core::{Interval, Symbol};
use coinsift_features::FeatureEngine;

use crate::cli::FeaturesArgs;
use crate::error::CliError;
use crate::output;

use super::{CommandContext, CommandResult};

pub async fn run(args: &FeaturesArgs, ctx: &CommandContext) -> Result<CommandResult, CliError> {
    let interval: Interval = args.series.interval.parse()?;
    if args.series.lookback == 0 {
        return Err(CliError::Command(String::from(
            "lookback must be at least 1",
        )));
    }

    let engine = FeatureEngine::new(super::feature_config(&args.windows))?;

    let symbols = args
        .symbols
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut artifacts = Vec::new();
    let mut errors = Vec::new();
    for symbol in symbols {
        match super::derive_symbol(ctx, &engine, symbol, interval, args.series.lookback).await {
            Ok(matrix) => artifacts.push(output::write_features_csv(&ctx.out_dir, &matrix)?),
            Err(issue) => errors.push(issue),
        }
    }

    let data = serde_json::json!({
        "requested": args.symbols.len(),
        "processed": artifacts.len(),
        "artifacts": artifacts,
    });

    Ok(CommandResult::ok(data).with_errors(errors))
}
