//! CLI argument definitions for coinsift.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `screen` | Screen the trading universe for qualifying small-cap pairs |
//! | `features` | Derive normalized feature tables for explicit symbols |
//! | `run` | Full pipeline: screen, then derive features for the top-K |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//! | `--out-dir` | `out` | Directory for CSV artifacts |
//!
//! # Examples
//!
//! ```bash
//! # Rank small caps under a 100M cap proxy
//! coinsift screen --cap-threshold 100000000 --min-age-days 90
//!
//! # Feature tables for two pairs at 5-minute resolution
//! coinsift features ABCUSDT DEFUSDT --interval 5m --lookback 500
//!
//! # The whole pipeline, strict mode for CI
//! coinsift run --top-k 10 --strict
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Small-cap screening and technical-feature derivation pipeline.
///
/// Screens a spot trading universe against cap-proxy, liquidity, and
/// listing-age filters, then derives normalized indicator matrices from
/// each qualifying pair's kline history.
#[derive(Debug, Parser)]
#[command(
    name = "coinsift",
    author,
    version,
    about = "Small-cap screening and feature derivation pipeline"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    ///
    /// Useful for CI/CD pipelines that need strict validation.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Per-request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 5000)]
    pub timeout_ms: u64,

    /// Directory CSV artifacts are written into (created when missing).
    #[arg(long, global = true, default_value = "out")]
    pub out_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Screen the trading universe for qualifying small-cap pairs.
    ///
    /// Evaluates every active pair quoting in the settlement asset
    /// against the cap-proxy ceiling, volume floor, and minimum listing
    /// age, writing the ranked survivors to qualifying_symbols.csv.
    ///
    /// # Examples
    ///
    ///   coinsift screen
    ///   coinsift screen --cap-threshold 50000000 --min-quote-volume 100000
    Screen(ScreenArgs),

    /// Derive normalized feature tables for explicit symbols.
    ///
    /// Fetches kline history per symbol and writes one
    /// <SYMBOL>_features.csv per successfully processed pair.
    ///
    /// # Examples
    ///
    ///   coinsift features ABCUSDT
    ///   coinsift features ABCUSDT DEFUSDT --interval 1h --lookback 720
    Features(FeaturesArgs),

    /// Full pipeline: screen, then derive features for the top-K.
    ///
    /// Per-symbol failures in the feature stage are reported in the
    /// envelope but never abort the remaining symbols.
    ///
    /// # Examples
    ///
    ///   coinsift run
    ///   coinsift run --top-k 5 --interval 15m
    Run(RunArgs),
}

/// Arguments for the `screen` command.
#[derive(Debug, Args)]
pub struct ScreenArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Arguments for the `features` command.
#[derive(Debug, Args)]
pub struct FeaturesArgs {
    /// One or more pair symbols (e.g., ABCUSDT).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub windows: WindowArgs,
}

/// Arguments for the `run` command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub series: SeriesArgs,

    #[command(flatten)]
    pub windows: WindowArgs,
}

/// Screening thresholds and resource limits.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Settlement asset candidates must quote in.
    #[arg(long, default_value = "USDT")]
    pub quote_asset: String,

    /// Cap-proxy ceiling (last price x 24h quote volume), in quote units.
    #[arg(long, default_value_t = 100_000_000.0)]
    pub cap_threshold: f64,

    /// 24h quote-volume floor, in quote units.
    #[arg(long, default_value_t = 0.0)]
    pub min_quote_volume: f64,

    /// Minimum listing age in days.
    ///
    /// When the venue reports no onboarding time, at least this many
    /// daily bars must exist instead (an approximation of age).
    #[arg(long, default_value_t = 90)]
    pub min_age_days: u32,

    /// Keep only the K smallest survivors (`run` defaults to 10).
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Worker-pool width for per-symbol evaluation.
    #[arg(long, default_value_t = 8)]
    pub concurrency: usize,
}

/// Kline fetch parameters.
#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Kline interval (1m, 5m, 15m, 1h, 4h, 1d).
    #[arg(long, default_value = "5m")]
    pub interval: String,

    /// Bars of history to fetch per symbol.
    #[arg(long, default_value_t = 500)]
    pub lookback: usize,
}

/// Indicator window parameters.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// RSI period.
    #[arg(long, default_value_t = 14)]
    pub rsi_period: usize,

    /// ADX period.
    #[arg(long, default_value_t = 14)]
    pub adx_period: usize,

    /// Volume moving-average period (also the dispersion window).
    #[arg(long, default_value_t = 20)]
    pub ma_period: usize,

    /// Bollinger band period.
    #[arg(long, default_value_t = 20)]
    pub bb_period: usize,

    /// Bollinger band width in standard deviations.
    #[arg(long, default_value_t = 2.0)]
    pub bb_std: f64,

    /// Rolling volatility period.
    #[arg(long, default_value_t = 14)]
    pub volatility_period: usize,

    /// Fast trend moving-average window.
    #[arg(long, default_value_t = 50)]
    pub trend_fast: usize,

    /// Slow trend moving-average window.
    #[arg(long, default_value_t = 200)]
    pub trend_slow: usize,
}
