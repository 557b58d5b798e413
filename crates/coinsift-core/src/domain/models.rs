use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol, UtcDateTime, ValidationError};

/// One row of the enumerated trading universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub symbol: Symbol,
    pub quote_asset: String,
    pub is_trading: bool,
    /// Listing time when the venue reports one; spot endpoints usually do not.
    pub onboard_time: Option<UtcDateTime>,
}

impl UniverseEntry {
    pub fn new(
        symbol: Symbol,
        quote_asset: impl Into<String>,
        is_trading: bool,
        onboard_time: Option<UtcDateTime>,
    ) -> Self {
        Self {
            symbol,
            quote_asset: quote_asset.into().to_ascii_uppercase(),
            is_trading,
            onboard_time,
        }
    }
}

/// 24h rolling quote snapshot, fetched fresh per screening pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub last_price: f64,
    pub quote_volume: f64,
}

impl QuoteSnapshot {
    pub fn new(symbol: Symbol, last_price: f64, quote_volume: f64) -> Result<Self, ValidationError> {
        validate_positive("last_price", last_price)?;
        validate_non_negative("quote_volume", quote_volume)?;

        Ok(Self {
            symbol,
            last_price,
            quote_volume,
        })
    }

    /// Liquidity-derived stand-in for market capitalization.
    ///
    /// True market cap needs circulating-supply data the venue does not
    /// expose, so `last_price * quote_volume` substitutes for it.
    pub fn cap_proxy(&self) -> f64 {
        self.last_price * self.quote_volume
    }
}

/// Evidence that a pair has been listed for a minimum period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AgeProof {
    /// Days elapsed since the venue-reported onboarding time.
    OnboardDays(u32),
    /// Count of observed daily bars.
    ///
    /// Substituted when no onboarding time is available. This is an
    /// approximation: a pair can predate its first retrievable bar.
    ObservedBars(u32),
}

impl AgeProof {
    pub const fn days_or_bars(self) -> u32 {
        match self {
            Self::OnboardDays(days) => days,
            Self::ObservedBars(bars) => bars,
        }
    }

    pub const fn satisfies_min_age(self, min_age_days: u32) -> bool {
        self.days_or_bars() >= min_age_days
    }
}

/// Listing-age record for one pair, valid for a single screening pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub symbol: Symbol,
    pub age: AgeProof,
}

/// Single OHLCV bar.
///
/// The venue does not guarantee internal OHLC consistency, so positivity
/// and `low <= {open, close} <= high` are enforced here instead of trusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        ts: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;
        validate_non_negative("volume", volume)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }
        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Ordered OHLCV series for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub interval: Interval,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, enforcing strictly increasing timestamps.
    pub fn new(symbol: Symbol, interval: Interval, bars: Vec<Bar>) -> Result<Self, ValidationError> {
        for (index, window) in bars.windows(2).enumerate() {
            if window[1].ts <= window[0].ts {
                return Err(ValidationError::NonMonotonicSeries { index: index + 1 });
            }
        }

        Ok(Self {
            symbol,
            interval,
            bars,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
