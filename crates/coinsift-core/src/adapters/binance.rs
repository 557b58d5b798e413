use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::data_source::{KlinesRequest, MarketDataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::throttling::ThrottlingQueue;
use crate::{Bar, BarSeries, ProviderId, QuoteSnapshot, Symbol, UniverseEntry, UtcDateTime};

const SPOT_API_BASE: &str = "https://api.binance.com";

/// Environment variable holding the optional venue API key.
///
/// All consumed endpoints are public; the key only raises rate quotas.
pub const API_KEY_ENV: &str = "COINSIFT_API_KEY";

/// Spot REST adapter.
///
/// Owns throttling and error mapping; the engines only ever see the
/// [`MarketDataSource`] contract.
#[derive(Clone)]
pub struct BinanceAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: Option<String>,
    throttle: ThrottlingQueue,
    timeout_ms: u64,
}

impl BinanceAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(SPOT_API_BASE),
            api_key: None,
            throttle: ThrottlingQueue::spot_default(),
            timeout_ms: 5_000,
        }
    }

    /// Build an adapter with the API key taken from the environment.
    pub fn from_env(http_client: Arc<dyn HttpClient>) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|v| !v.is_empty());
        Self {
            api_key,
            ..Self::new(http_client)
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottlingQueue) -> Self {
        self.throttle = throttle;
        self
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<HttpResponse, SourceError> {
        // Local budget check before the wire; the venue still answers 429
        // when other clients share the quota.
        if let Err(delay) = self.throttle.acquire() {
            tokio::time::sleep(delay).await;
            self.throttle.complete_one();
        }

        let mut url = format!("{}{path}", self.base_url);
        for (index, (name, value)) in query.iter().enumerate() {
            let sep = if index == 0 { '?' } else { '&' };
            url.push(sep);
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        let mut request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        if let Some(key) = &self.api_key {
            request = request.with_header("X-MBX-APIKEY", key);
        }

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::transient(format!("transport failure: {}", error.message()))
            } else {
                SourceError::internal(format!("transport failure: {}", error.message()))
            }
        })?;

        match response.status {
            _ if response.is_success() => Ok(response),
            // 418 is the venue's auto-ban escalation of 429.
            429 | 418 => Err(SourceError::rate_limited(format!(
                "venue throttled request to {path} (status {})",
                response.status
            ))),
            status if status >= 500 => Err(SourceError::transient(format!(
                "venue unavailable for {path} (status {status})"
            ))),
            404 => Err(SourceError::data_unavailable(format!(
                "no data behind {path}"
            ))),
            status => Err(SourceError::invalid_request(format!(
                "venue rejected request to {path} (status {status})"
            ))),
        }
    }
}

#[async_trait]
impl MarketDataSource for BinanceAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Binance
    }

    async fn universe(&self) -> Result<Vec<UniverseEntry>, SourceError> {
        let response = self.send("/api/v3/exchangeInfo", &[]).await?;
        let payload: ExchangeInfoPayload = parse_json(&response.body)?;

        let mut entries = Vec::with_capacity(payload.symbols.len());
        for raw in payload.symbols {
            // Entries the symbol grammar rejects cannot be traded through
            // this pipeline anyway; drop them instead of failing the run.
            let Ok(symbol) = Symbol::parse(&raw.symbol) else {
                continue;
            };
            let onboard_time = match raw.onboard_date {
                Some(millis) => UtcDateTime::from_unix_millis(millis).ok(),
                None => None,
            };
            entries.push(UniverseEntry::new(
                symbol,
                raw.quote_asset,
                raw.status == "TRADING",
                onboard_time,
            ));
        }

        Ok(entries)
    }

    async fn quote(&self, symbol: &Symbol) -> Result<QuoteSnapshot, SourceError> {
        let response = self
            .send(
                "/api/v3/ticker/24hr",
                &[("symbol", symbol.as_str().to_owned())],
            )
            .await?;
        let payload: TickerPayload = parse_json(&response.body)?;

        let last_price = parse_decimal("lastPrice", &payload.last_price)?;
        let quote_volume = parse_decimal("quoteVolume", &payload.quote_volume)?;

        QuoteSnapshot::new(symbol.clone(), last_price, quote_volume).map_err(|error| {
            // Zero-price tickers show up on halted pairs; treat them as
            // having no usable quote rather than as a protocol fault.
            SourceError::data_unavailable(format!("unusable quote for {symbol}: {error}"))
        })
    }

    async fn klines(&self, req: &KlinesRequest) -> Result<BarSeries, SourceError> {
        let mut query = vec![
            ("symbol", req.symbol.as_str().to_owned()),
            ("interval", req.interval.as_str().to_owned()),
            ("limit", req.limit.to_string()),
        ];
        if let Some(since) = req.since {
            query.push(("startTime", since.unix_millis().to_string()));
        }

        let response = self.send("/api/v3/klines", &query).await?;
        let rows: Vec<KlineRow> = parse_json(&response.body)?;

        if rows.is_empty() {
            return Err(SourceError::data_unavailable(format!(
                "no klines for {} at {}",
                req.symbol, req.interval
            )));
        }

        let mut bars = Vec::with_capacity(rows.len());
        for row in &rows {
            bars.push(parse_kline_row(&req.symbol, row)?);
        }

        BarSeries::new(req.symbol.clone(), req.interval, bars).map_err(|error| {
            SourceError::malformed_bar(format!("kline series for {}: {error}", req.symbol))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoPayload {
    symbols: Vec<ExchangeSymbolPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeSymbolPayload {
    symbol: String,
    status: String,
    quote_asset: String,
    #[serde(default)]
    onboard_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerPayload {
    last_price: String,
    quote_volume: String,
}

/// Kline wire rows are positional arrays mixing integers and
/// string-encoded decimals.
type KlineRow = Vec<serde_json::Value>;

fn parse_kline_row(symbol: &Symbol, row: &KlineRow) -> Result<Bar, SourceError> {
    if row.len() < 6 {
        return Err(SourceError::internal(format!(
            "kline row for {symbol} has {} fields, expected at least 6",
            row.len()
        )));
    }

    let millis = row[0].as_i64().ok_or_else(|| {
        SourceError::internal(format!("kline open time for {symbol} is not an integer"))
    })?;
    let ts = UtcDateTime::from_unix_millis(millis)
        .map_err(|error| SourceError::malformed_bar(format!("kline for {symbol}: {error}")))?;

    let open = parse_decimal("open", field_str(symbol, row, 1)?)?;
    let high = parse_decimal("high", field_str(symbol, row, 2)?)?;
    let low = parse_decimal("low", field_str(symbol, row, 3)?)?;
    let close = parse_decimal("close", field_str(symbol, row, 4)?)?;
    let volume = parse_decimal("volume", field_str(symbol, row, 5)?)?;

    Bar::new(ts, open, high, low, close, volume)
        .map_err(|error| SourceError::malformed_bar(format!("kline for {symbol}: {error}")))
}

fn field_str<'a>(symbol: &Symbol, row: &'a KlineRow, index: usize) -> Result<&'a str, SourceError> {
    row[index].as_str().ok_or_else(|| {
        SourceError::internal(format!(
            "kline field {index} for {symbol} is not a string"
        ))
    })
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, SourceError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| SourceError::internal(format!("field '{field}' is not a decimal: '{raw}'")))
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body)
        .map_err(|error| SourceError::internal(format!("unexpected venue payload: {error}")))
}
