//! # Coinsift Core
//!
//! Core contracts and domain types for the coinsift screening pipeline.
//!
//! ## Overview
//!
//! This crate provides the foundation the engines build on:
//!
//! - **Canonical domain models** for pair symbols, quotes, listing age,
//!   and OHLCV series
//! - **Provider contract** ([`MarketDataSource`]) with a structured error
//!   taxonomy separating retryable from per-symbol-terminal failures
//! - **Transport plumbing**: an injectable HTTP client, jittered bounded
//!   retry, and a governor-backed throttling queue
//! - **Spot REST adapter** for the upstream venue
//!
//! ## Error Handling
//!
//! Provider calls return [`SourceError`] with a [`SourceErrorKind`]:
//! rate-limited and transient failures are retry candidates, while
//! data-unavailable and malformed-bar failures are terminal for one
//! symbol and must never abort a batch.
//!
//! ## Security
//!
//! The optional API key is read from the environment only and never
//! logged; all consumed endpoints are public read-only market data.

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod retry;
pub mod source;
pub mod throttling;

// Re-export commonly used types at crate root for convenience

pub use adapters::{BinanceAdapter, API_KEY_ENV};

pub use data_source::{KlinesRequest, MarketDataSource, SourceError, SourceErrorKind};

pub use domain::{
    AgeProof, Bar, BarSeries, Interval, ListingRecord, QuoteSnapshot, Symbol, UniverseEntry,
    UtcDateTime,
};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use retry::{call_with_retry, Backoff, RetryConfig};

pub use source::ProviderId;

pub use throttling::{ThrottleBackoff, ThrottlingQueue};
