//! Market quote fetching
//!
//! Thin client over a Yahoo-style `/v7/finance/quote` endpoint. Responses are
//! not cached; callers decide how long a quote stays useful.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{AdvisorError, Result};

// Pause between batches to avoid throttling
const BATCH_PAUSE: Duration = Duration::from_millis(200);

/// Display name and provider symbol, in display order.
pub const MAJOR_INDICES: [(&str, &str); 6] = [
    ("Dow", "^DJI"),
    ("S&P 500", "^GSPC"),
    ("Nasdaq", "^IXIC"),
    ("VIX", "^VIX"),
    ("Gold", "GC=F"),
    ("Oil", "CL=F"),
];

/// Symbol whose daily move drives [`market_sentiment`].
pub const SENTIMENT_SYMBOL: &str = "SPY";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedQuote {
    pub name: String,
    #[serde(flatten)]
    pub quote: Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketSentiment {
    #[serde(rename = "Strongly Positive")]
    StronglyPositive,
    #[serde(rename = "Slightly Positive")]
    SlightlyPositive,
    #[serde(rename = "Slightly Negative")]
    SlightlyNegative,
    #[serde(rename = "Strongly Negative")]
    StronglyNegative,
}

impl MarketSentiment {
    pub fn label(&self) -> &'static str {
        match self {
            MarketSentiment::StronglyPositive => "Strongly Positive",
            MarketSentiment::SlightlyPositive => "Slightly Positive",
            MarketSentiment::SlightlyNegative => "Slightly Negative",
            MarketSentiment::StronglyNegative => "Strongly Negative",
        }
    }
}

/// Bucket a daily percentage move. Each threshold is exclusive, so a flat
/// day counts as slightly negative.
pub fn market_sentiment(change_percent: f64) -> MarketSentiment {
    if change_percent > 1.0 {
        MarketSentiment::StronglyPositive
    } else if change_percent > 0.0 {
        MarketSentiment::SlightlyPositive
    } else if change_percent > -1.0 {
        MarketSentiment::SlightlyNegative
    } else {
        MarketSentiment::StronglyNegative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub timestamp: DateTime<Utc>,
    /// `None` when the provider had no price for the benchmark.
    pub benchmark: Option<Quote>,
    pub market_sentiment: MarketSentiment,
}

pub struct QuoteClient {
    client: reqwest::Client,
    base_url: String,
    batch_size: usize,
}

impl QuoteClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.http_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.quote_url.trim_end_matches('/').to_string(),
            batch_size: settings.quote_batch_size.max(1),
        })
    }

    /// Fetch quotes for `symbols`, one request per batch.
    ///
    /// Symbols the provider returns no price for are left out of the result.
    pub async fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>> {
        let mut quotes = Vec::with_capacity(symbols.len());

        for (batch_idx, chunk) in symbols.chunks(self.batch_size).enumerate() {
            if batch_idx > 0 {
                tokio::time::sleep(BATCH_PAUSE).await;
            }

            let url = format!("{}/v7/finance/quote", self.base_url);
            let resp = self
                .client
                .get(&url)
                .query(&[("symbols", chunk.join(","))])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(AdvisorError::market_data(format!(
                    "quote request failed [CODE: {}]: {}",
                    status, text
                )));
            }

            let json: Value = resp.json().await?;
            let parsed = parse_quote_response(&json, Utc::now());
            if parsed.len() < chunk.len() {
                warn!(
                    requested = chunk.len(),
                    received = parsed.len(),
                    "some symbols returned no price"
                );
            }
            debug!(batch = batch_idx, quotes = parsed.len(), "fetched quote batch");
            quotes.extend(parsed);
        }

        Ok(quotes)
    }

    /// Quotes for [`MAJOR_INDICES`] tagged with their display names.
    ///
    /// Follows the table order; indices without a price are skipped.
    pub async fn major_indices(&self) -> Result<Vec<NamedQuote>> {
        let symbols: Vec<String> = MAJOR_INDICES.iter().map(|(_, s)| s.to_string()).collect();
        let mut quotes = self.fetch_quotes(&symbols).await?;

        let named = MAJOR_INDICES
            .iter()
            .filter_map(|(name, symbol)| {
                let idx = quotes.iter().position(|q| q.symbol == *symbol)?;
                Some(NamedQuote {
                    name: name.to_string(),
                    quote: quotes.swap_remove(idx),
                })
            })
            .collect();
        Ok(named)
    }

    /// Benchmark quote plus the sentiment it implies.
    ///
    /// A benchmark without a reported move reads as unchanged.
    pub async fn market_summary(&self) -> Result<MarketSummary> {
        let quotes = self.fetch_quotes(&[SENTIMENT_SYMBOL.to_string()]).await?;
        let benchmark = quotes.into_iter().find(|q| q.symbol == SENTIMENT_SYMBOL);
        let change = benchmark
            .as_ref()
            .and_then(|q| q.change_percent)
            .unwrap_or(0.0);
        let sentiment = market_sentiment(change);
        info!(change, sentiment = sentiment.label(), "computed market summary");

        Ok(MarketSummary {
            timestamp: Utc::now(),
            benchmark,
            market_sentiment: sentiment,
        })
    }
}

/// Pull quotes out of a `quoteResponse.result` payload.
///
/// Price falls back from the regular market price to the post-market price and
/// then to the previous close.
pub fn parse_quote_response(json: &Value, fetched_at: DateTime<Utc>) -> Vec<Quote> {
    let Some(results) = json["quoteResponse"]["result"].as_array() else {
        return Vec::new();
    };

    results
        .iter()
        .filter_map(|item| {
            let symbol = item["symbol"].as_str()?;
            let price = item["regularMarketPrice"]
                .as_f64()
                .or_else(|| item["postMarketPrice"].as_f64())
                .or_else(|| item["regularMarketPreviousClose"].as_f64())?;

            Some(Quote {
                symbol: symbol.to_string(),
                price,
                change: item["regularMarketChange"].as_f64(),
                change_percent: item["regularMarketChangePercent"].as_f64(),
                volume: item["regularMarketVolume"].as_u64(),
                fetched_at,
            })
        })
        .collect()
}
