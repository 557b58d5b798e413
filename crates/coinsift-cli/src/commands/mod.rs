mod features;
mod pipeline;
mod screen;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use coinsift_core::{
    call_with_retry, BinanceAdapter, Interval, KlinesRequest, MarketDataSource, ReqwestHttpClient,
    RetryConfig, Symbol,
};
use coinsift_features::{FeatureConfig, FeatureEngine, FeatureError, NormalizedFeatureMatrix};
use coinsift_screen::{ScreenConfig, ScreenReport};

use crate::cli::{Cli, Command, FilterArgs, WindowArgs};
use crate::error::CliError;
use crate::metadata::RunId;
use crate::output::{Envelope, EnvelopeIssue, RunMeta};

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeIssue>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeIssue>) -> Self {
        self.errors.extend(errors);
        self
    }
}

/// Shared per-invocation state: one explicitly constructed provider,
/// injected into every command. No process-wide singletons.
pub(crate) struct CommandContext {
    pub source: Arc<BinanceAdapter>,
    pub out_dir: PathBuf,
    pub retry: RetryConfig,
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let started = Instant::now();

    let http_client = Arc::new(ReqwestHttpClient::new());
    let source = Arc::new(BinanceAdapter::from_env(http_client).with_timeout_ms(cli.timeout_ms));
    let ctx = CommandContext {
        source,
        out_dir: cli.out_dir.clone(),
        retry: RetryConfig::default(),
    };

    let result = match &cli.command {
        Command::Screen(args) => screen::run(args, &ctx).await?,
        Command::Features(args) => features::run(args, &ctx).await?,
        Command::Run(args) => pipeline::run(args, &ctx).await?,
    };

    Ok(Envelope {
        meta: RunMeta {
            run_id: RunId::new_v4(),
            provider: ctx.source.id(),
            latency_ms: started.elapsed().as_millis() as u64,
            warnings: result.warnings,
        },
        data: result.data,
        errors: result.errors,
    })
}

pub(crate) fn screen_config(args: &FilterArgs, retry: RetryConfig) -> ScreenConfig {
    ScreenConfig {
        quote_asset: args.quote_asset.clone(),
        cap_threshold: args.cap_threshold,
        min_quote_volume: args.min_quote_volume,
        min_age_days: args.min_age_days,
        top_k: args.top_k,
        concurrency: args.concurrency,
        retry,
    }
}

pub(crate) fn feature_config(args: &WindowArgs) -> FeatureConfig {
    FeatureConfig {
        rsi_period: args.rsi_period,
        adx_period: args.adx_period,
        ma_period: args.ma_period,
        bb_period: args.bb_period,
        bb_std: args.bb_std,
        volatility_period: args.volatility_period,
        trend_fast: args.trend_fast,
        trend_slow: args.trend_slow,
    }
}

pub(crate) fn skip_warnings(report: &ScreenReport) -> Vec<String> {
    report
        .skips
        .iter()
        .map(|skip| format!("skipped {}: {} ({})", skip.symbol, skip.reason, skip.code))
        .collect()
}

/// Fetch one symbol's history and derive its normalized feature matrix.
///
/// Every failure mode is folded into an [`EnvelopeIssue`] so the caller
/// can keep going with the remaining symbols.
pub(crate) async fn derive_symbol(
    ctx: &CommandContext,
    engine: &FeatureEngine,
    symbol: Symbol,
    interval: Interval,
    lookback: usize,
) -> Result<NormalizedFeatureMatrix, EnvelopeIssue> {
    let request = KlinesRequest::new(symbol.clone(), interval, lookback, None)
        .map_err(|error| EnvelopeIssue::new(error.code(), error.to_string()))?;

    let series = call_with_retry(ctx.retry, || ctx.source.klines(&request))
        .await
        .map_err(|error| EnvelopeIssue::new(error.code(), error.to_string()))?;

    engine.derive_normalized(&series).map_err(|error| {
        let code = match &error {
            FeatureError::InsufficientHistory { .. } => "features.insufficient_history",
            FeatureError::InvalidConfig { .. } => "features.invalid_config",
        };
        EnvelopeIssue::new(code, error.to_string())
    })
}
