use std::cmp::Ordering;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use coinsift_core::{
    call_with_retry, AgeProof, Interval, KlinesRequest, ListingRecord, MarketDataSource,
    SourceError, UniverseEntry, UtcDateTime,
};

use crate::{ScreenConfig, ScreenError, ScreenReport, ScreeningResult, SymbolSkip};

/// Per-symbol evaluation outcome.
///
/// Predicate failures are silent (`Filtered`); provider failures carry a
/// reason and surface as warnings. No error crosses the task boundary.
enum Outcome {
    Qualified(ScreeningResult),
    Filtered,
    Skipped(SymbolSkip),
}

/// Concurrent multi-criterion screener over a rate-limited provider.
///
/// Each candidate is evaluated independently on a bounded worker pool; the
/// unordered outcome set is re-sorted after collection, so completion
/// order never affects the ranked output.
pub struct ScreeningEngine<S> {
    source: Arc<S>,
    config: ScreenConfig,
}

impl<S: MarketDataSource> ScreeningEngine<S> {
    pub fn new(source: Arc<S>, config: ScreenConfig) -> Result<Self, ScreenError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Run one screening pass over the full universe.
    ///
    /// Dropping the returned future cancels in-flight provider calls;
    /// outcomes collected before that point are simply discarded with it.
    pub async fn run(&self) -> Result<ScreenReport, ScreenError> {
        let universe = self
            .source
            .universe()
            .await
            .map_err(ScreenError::UniverseUnavailable)?;

        let candidates: Vec<UniverseEntry> = universe
            .into_iter()
            .filter(|entry| entry.is_trading && entry.quote_asset == self.config.quote_asset)
            .collect();
        let evaluated = candidates.len();

        let outcomes: Vec<Outcome> = stream::iter(candidates)
            .map(|entry| self.evaluate(entry))
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut results = Vec::new();
        let mut skips = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Qualified(result) => results.push(result),
                Outcome::Filtered => {}
                Outcome::Skipped(skip) => skips.push(skip),
            }
        }

        // Secondary symbol key keeps the ranking reproducible when the
        // universe enumeration order varies between runs.
        results.sort_by(|a, b| {
            a.cap_proxy
                .partial_cmp(&b.cap_proxy)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        skips.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        if let Some(top_k) = self.config.top_k {
            results.truncate(top_k);
        }

        Ok(ScreenReport {
            results,
            skips,
            evaluated,
        })
    }

    async fn evaluate(&self, entry: UniverseEntry) -> Outcome {
        let fetched =
            call_with_retry(self.config.retry, || self.source.quote(&entry.symbol)).await;
        let quote = match fetched {
            Ok(quote) => quote,
            Err(error) => return Outcome::Skipped(SymbolSkip::new(entry.symbol, &error)),
        };

        let cap_proxy = quote.cap_proxy();
        if cap_proxy >= self.config.cap_threshold {
            return Outcome::Filtered;
        }
        if quote.quote_volume < self.config.min_quote_volume {
            return Outcome::Filtered;
        }

        // Age proof is fetched last; symbols the cheap predicates already
        // rejected never cost a kline call.
        let proven = self.listing_record(&entry).await;
        let listing = match proven {
            Ok(listing) => listing,
            Err(error) => return Outcome::Skipped(SymbolSkip::new(entry.symbol, &error)),
        };
        if !listing.age.satisfies_min_age(self.config.min_age_days) {
            return Outcome::Filtered;
        }

        Outcome::Qualified(ScreeningResult {
            symbol: listing.symbol,
            cap_proxy,
            quote_volume: quote.quote_volume,
            age: listing.age,
        })
    }

    async fn listing_record(&self, entry: &UniverseEntry) -> Result<ListingRecord, SourceError> {
        if let Some(onboard) = entry.onboard_time {
            return Ok(ListingRecord {
                symbol: entry.symbol.clone(),
                age: AgeProof::OnboardDays(onboard.days_until(UtcDateTime::now())),
            });
        }

        // No onboarding time from the venue: count daily bars instead.
        // Asking for exactly `min_age_days` bars is enough to decide the
        // predicate either way.
        let limit = self.config.min_age_days.max(1) as usize;
        let request = KlinesRequest::new(entry.symbol.clone(), Interval::OneDay, limit, None)?;
        let series = call_with_retry(self.config.retry, || self.source.klines(&request)).await?;
        Ok(ListingRecord {
            symbol: entry.symbol.clone(),
            age: AgeProof::ObservedBars(series.len() as u32),
        })
    }
}

/// Convenience entry point mirroring the one-call shape most callers want.
pub async fn screen<S: MarketDataSource>(
    source: Arc<S>,
    config: ScreenConfig,
) -> Result<ScreenReport, ScreenError> {
    ScreeningEngine::new(source, config)?.run().await
}
