use std::fmt::{Display, Formatter};

use async_trait::async_trait;

use crate::{BarSeries, Interval, ProviderId, QuoteSnapshot, Symbol, UniverseEntry, UtcDateTime};

/// Provider-level error classification.
///
/// `RateLimited` and `Transient` are retry candidates; the remaining kinds
/// are terminal for the call (and, for `DataUnavailable`/`MalformedBar`,
/// terminal for one symbol, never the batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    RateLimited,
    Transient,
    DataUnavailable,
    MalformedBar,
    InvalidRequest,
    Internal,
}

/// Structured provider error carried across the symbol boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transient,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::DataUnavailable,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed_bar(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedBar,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Transient => "source.transient",
            SourceErrorKind::DataUnavailable => "source.data_unavailable",
            SourceErrorKind::MalformedBar => "source.malformed_bar",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for kline endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct KlinesRequest {
    pub symbol: Symbol,
    pub interval: Interval,
    pub limit: usize,
    /// Lower time bound; bars strictly before this instant are excluded.
    pub since: Option<UtcDateTime>,
}

impl KlinesRequest {
    pub fn new(
        symbol: Symbol,
        interval: Interval,
        limit: usize,
        since: Option<UtcDateTime>,
    ) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "klines request limit must be greater than zero",
            ));
        }
        Ok(Self {
            symbol,
            interval,
            limit,
            since,
        })
    }
}

/// Market-data provider contract consumed by the engines.
///
/// One `universe()` call enumerates all known pairs; `quote` and `klines`
/// are per-symbol. Implementations own their throttling and error mapping.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn universe(&self) -> Result<Vec<UniverseEntry>, SourceError>;

    async fn quote(&self, symbol: &Symbol) -> Result<QuoteSnapshot, SourceError>;

    async fn klines(&self, req: &KlinesRequest) -> Result<BarSeries, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_limit() {
        let err = KlinesRequest::new(
            Symbol::parse("BTCUSDT").expect("symbol"),
            Interval::OneDay,
            0,
            None,
        )
        .expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }

    #[test]
    fn retryability_follows_kind() {
        assert!(SourceError::rate_limited("429").retryable());
        assert!(SourceError::transient("connect reset").retryable());
        assert!(!SourceError::data_unavailable("no klines").retryable());
        assert!(!SourceError::malformed_bar("high < low").retryable());
    }
}
