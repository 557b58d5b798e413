//! Envelope rendering and CSV artifact writers.
//!
//! Column order in both artifacts is part of the downstream contract and
//! must not change between releases.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use coinsift_core::ProviderId;
use coinsift_features::{NormalizedFeatureMatrix, FEATURE_NAMES};
use coinsift_screen::ScreenReport;

use crate::error::CliError;
use crate::metadata::RunId;

/// Structured per-symbol issue surfaced in the envelope.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeIssue {
    pub code: String,
    pub message: String,
}

impl EnvelopeIssue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Envelope metadata block.
#[derive(Debug, Serialize)]
pub struct RunMeta {
    pub run_id: RunId,
    pub provider: ProviderId,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// JSON output envelope printed to stdout.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub meta: RunMeta,
    pub data: Value,
    pub errors: Vec<EnvelopeIssue>,
}

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    println!("{rendered}");
    Ok(())
}

/// Write the ranked qualifying-symbols table.
pub fn write_screen_csv(out_dir: &Path, report: &ScreenReport) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join("qualifying_symbols.csv");
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "symbol,cap_proxy,quote_volume,age_days")?;
    for result in &report.results {
        writeln!(
            writer,
            "{},{},{},{}",
            result.symbol,
            result.cap_proxy,
            result.quote_volume,
            result.age.days_or_bars()
        )?;
    }

    writer.flush()?;
    eprintln!(
        "✓ Wrote {} qualifying symbols to {}",
        report.results.len(),
        path.display()
    );
    Ok(path)
}

/// Write one normalized feature table.
pub fn write_features_csv(
    out_dir: &Path,
    matrix: &NormalizedFeatureMatrix,
) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{}_features.csv", matrix.symbol));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "timestamp,symbol,open,high,low,close,volume,{}",
        FEATURE_NAMES.join(",")
    )?;
    for row in &matrix.rows {
        let features: Vec<String> = row.features.iter().map(f64::to_string).collect();
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            row.ts.format_rfc3339(),
            matrix.symbol,
            row.open,
            row.high,
            row.low,
            row.close,
            row.volume,
            features.join(",")
        )?;
    }

    writer.flush()?;
    eprintln!(
        "✓ Wrote {} feature rows to {}",
        matrix.rows.len(),
        path.display()
    );
    Ok(path)
}
