// src/fetch/vendor.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;
use url::Url;

use crate::config::VendorConfig;

/// Real-time quote for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    #[serde(alias = "c")]
    pub current: f64,
    #[serde(default, alias = "d")]
    pub change: Option<f64>,
    #[serde(default, alias = "dp")]
    pub change_percent: Option<f64>,
    #[serde(alias = "h")]
    pub high: f64,
    #[serde(alias = "l")]
    pub low: f64,
    #[serde(alias = "o")]
    pub open: f64,
    #[serde(alias = "pc")]
    pub previous_close: f64,
}

/// Company profile, including the logo URL the dashboard shows next to each
/// holding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default, alias = "marketCapitalization")]
    pub market_capitalization: Option<f64>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub datetime: i64,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsEvent {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "epsEstimate")]
    pub eps_estimate: Option<f64>,
    #[serde(default, alias = "epsActual")]
    pub eps_actual: Option<f64>,
    #[serde(default)]
    pub hour: String,
    #[serde(default)]
    pub quarter: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EarningsCalendarResponse {
    #[serde(default, alias = "earningsCalendar")]
    earnings_calendar: Vec<EarningsEvent>,
}

/// Earnings-call transcript for one symbol and quarter. The transcript may
/// be empty when the vendor has nothing on file yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub quarter: Option<u32>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub transcript: String,
}

/// Everything the enrichment pass gathered for the held tickers, bundled
/// into one snapshot for the dashboard.
#[derive(Debug, Default, Serialize)]
pub struct MarketSnapshot {
    pub quotes: BTreeMap<String, Quote>,
    pub profiles: BTreeMap<String, CompanyProfile>,
    pub news: BTreeMap<String, Vec<NewsItem>>,
    pub earnings: BTreeMap<String, Vec<EarningsEvent>>,
    pub summaries: BTreeMap<String, String>,
}

/// Thin client over the market-data vendor's REST API.
///
/// Per-ticker batch helpers iterate **sequentially** with a fixed pause
/// between calls; the vendor throttles bursts, and this cooperative delay is
/// the whole rate-limit story. A failed symbol is logged and skipped,
/// never retried, and never aborts the rest of the batch.
pub struct VendorClient {
    client: Client,
    base_url: Url,
    api_key: String,
    throttle: Duration,
}

impl VendorClient {
    pub fn new(client: Client, config: &VendorConfig) -> Result<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .with_context(|| format!("parsing vendor base URL {}", config.base_url))?;
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            throttle: Duration::from_millis(config.throttle_ms),
        })
    }

    /// The fixed inter-request pause. Exposed so callers weaving their own
    /// per-ticker loops (transcripts + summaries) keep the same cadence.
    pub async fn pause(&self) {
        sleep(self.throttle).await;
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .with_context(|| format!("joining vendor path {}", path))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("token", &self.api_key);
        }
        Ok(url)
    }

    // Contexts use the path only: the full URL carries the API key.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let path = url.path().to_string();
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {}", path))?
            .error_for_status()
            .with_context(|| format!("vendor error status for {}", path))?
            .json::<T>()
            .await
            .with_context(|| format!("decoding response from {}", path))
    }

    pub async fn quote(&self, symbol: &str) -> Result<Quote> {
        let url = self.endpoint("quote", &[("symbol", symbol)])?;
        self.get_json(url).await
    }

    pub async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let url = self.endpoint("stock/profile", &[("symbol", symbol)])?;
        self.get_json(url).await
    }

    /// News published for `symbol` between `from` and `to` (YYYY-MM-DD).
    pub async fn company_news(&self, symbol: &str, from: &str, to: &str) -> Result<Vec<NewsItem>> {
        let url = self.endpoint(
            "company-news",
            &[("symbol", symbol), ("from", from), ("to", to)],
        )?;
        self.get_json(url).await
    }

    /// Earnings-calendar entries for `symbol` between `from` and `to`.
    pub async fn earnings_calendar(
        &self,
        symbol: &str,
        from: &str,
        to: &str,
    ) -> Result<Vec<EarningsEvent>> {
        let url = self.endpoint(
            "calendar/earnings",
            &[("symbol", symbol), ("from", from), ("to", to)],
        )?;
        let response: EarningsCalendarResponse = self.get_json(url).await?;
        Ok(response.earnings_calendar)
    }

    pub async fn earnings_transcript(
        &self,
        symbol: &str,
        quarter: u32,
        year: u32,
    ) -> Result<Transcript> {
        let url = self.endpoint(
            "stock/transcript",
            &[
                ("symbol", symbol),
                ("quarter", &quarter.to_string()),
                ("year", &year.to_string()),
            ],
        )?;
        self.get_json(url).await
    }

    /// Quotes for every ticker, sequentially with the configured pause.
    pub async fn quotes_for(&self, symbols: &[String]) -> BTreeMap<String, Quote> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            match self.quote(symbol).await {
                Ok(quote) => {
                    out.insert(symbol.clone(), quote);
                }
                Err(err) => warn!(symbol = %symbol, error = %err, "quote fetch failed"),
            }
            self.pause().await;
        }
        out
    }

    /// Company profiles for every ticker, sequentially with the configured
    /// pause.
    pub async fn profiles_for(&self, symbols: &[String]) -> BTreeMap<String, CompanyProfile> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            match self.company_profile(symbol).await {
                Ok(profile) => {
                    out.insert(symbol.clone(), profile);
                }
                Err(err) => warn!(symbol = %symbol, error = %err, "profile fetch failed"),
            }
            self.pause().await;
        }
        out
    }

    /// Recent news per ticker, sequentially with the configured pause.
    pub async fn news_for(
        &self,
        symbols: &[String],
        from: &str,
        to: &str,
    ) -> BTreeMap<String, Vec<NewsItem>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            match self.company_news(symbol, from, to).await {
                Ok(items) => {
                    out.insert(symbol.clone(), items);
                }
                Err(err) => warn!(symbol = %symbol, error = %err, "news fetch failed"),
            }
            self.pause().await;
        }
        out
    }

    /// Earnings-calendar entries per ticker, sequentially with the
    /// configured pause.
    pub async fn earnings_for(
        &self,
        symbols: &[String],
        from: &str,
        to: &str,
    ) -> BTreeMap<String, Vec<EarningsEvent>> {
        let mut out = BTreeMap::new();
        for symbol in symbols {
            match self.earnings_calendar(symbol, from, to).await {
                Ok(events) => {
                    out.insert(symbol.clone(), events);
                }
                Err(err) => warn!(symbol = %symbol, error = %err, "earnings fetch failed"),
            }
            self.pause().await;
        }
        out
    }
}
