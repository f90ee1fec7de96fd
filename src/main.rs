use anyhow::Result;
use chrono::{Duration, Utc};
use foliofeed::{
    cache::SheetCache,
    config::Config,
    fetch::{
        sheets,
        summary::{summarize, SummaryRequest},
        vendor::{MarketSnapshot, VendorClient},
    },
    snapshot::SnapshotStore,
};
use reqwest::Client;
use std::env;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Snapshots kept per dataset after each run.
const SNAPSHOT_KEEP: usize = 5;
/// How far back the news window reaches, in days.
const NEWS_WINDOW_DAYS: i64 = 7;
/// Earnings calendar horizon on each side of today, in days.
const EARNINGS_WINDOW_DAYS: i64 = 90;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,foliofeed=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "foliofeed.yaml".to_string());
    let config = Config::load(&config_path)?;
    info!(config = %config_path, tabs = config.tabs.len(), "configured");

    let client = Client::new();
    let cache = SheetCache::new();
    let store = SnapshotStore::new(&config.snapshot_dir)?;

    // ─── 3) fetch + normalize every sheet tab ────────────────────────
    let datasets = sheets::fetch_all_datasets(&client, &config, &cache).await;
    if datasets.is_empty() {
        anyhow::bail!("no datasets could be loaded");
    }
    for (name, table) in &datasets {
        info!(
            dataset = %name,
            columns = table.categories.len(),
            records = table.records.len(),
            "ingested"
        );
        store.write(name, table)?;
    }

    // ─── 4) collect tickers from the holdings tab ────────────────────
    let tickers: Vec<String> = datasets
        .get(&config.holdings_tab)
        .map(|table| table.key_column_values())
        .unwrap_or_default();
    if tickers.is_empty() {
        warn!(tab = %config.holdings_tab, "no tickers to enrich");
    } else {
        info!(count = tickers.len(), "tickers to enrich");
    }

    // ─── 5) per-ticker market data, throttled ────────────────────────
    let vendor = VendorClient::new(client.clone(), &config.vendor)?;
    let today = Utc::now().date_naive();
    let news_from = (today - Duration::days(NEWS_WINDOW_DAYS)).to_string();
    let earnings_from = (today - Duration::days(EARNINGS_WINDOW_DAYS)).to_string();
    let earnings_to = (today + Duration::days(EARNINGS_WINDOW_DAYS)).to_string();
    let today = today.to_string();

    let mut market = MarketSnapshot::default();
    market.quotes = vendor.quotes_for(&tickers).await;
    market.profiles = vendor.profiles_for(&tickers).await;
    market.news = vendor.news_for(&tickers, &news_from, &today).await;
    market.earnings = vendor
        .earnings_for(&tickers, &earnings_from, &earnings_to)
        .await;

    // ─── 6) earnings-call summaries ──────────────────────────────────
    if let Some(summarizer) = &config.summarizer {
        for (symbol, events) in &market.earnings {
            // Summarize the most recent call that has actually been reported.
            let Some(event) = events.iter().rev().find(|e| e.eps_actual.is_some()) else {
                continue;
            };
            let (Some(quarter), Some(year)) = (event.quarter, event.year) else {
                continue;
            };

            match vendor.earnings_transcript(symbol, quarter, year).await {
                Ok(t) if !t.transcript.is_empty() => {
                    let label = format!("Q{} {}", quarter, year);
                    let request = SummaryRequest {
                        ticker: symbol,
                        transcript: &t.transcript,
                        quarter: &label,
                    };
                    match summarize(&client, summarizer, &request).await {
                        Ok(text) => {
                            market.summaries.insert(symbol.clone(), text);
                        }
                        Err(err) => warn!(symbol = %symbol, error = %err, "summary failed"),
                    }
                }
                Ok(_) => debug!(symbol = %symbol, "no transcript on file"),
                Err(err) => warn!(symbol = %symbol, error = %err, "transcript fetch failed"),
            }
            vendor.pause().await;
        }
    }

    // ─── 7) write market snapshot + prune old ones ───────────────────
    store.write("market", &market)?;
    for tab in &config.tabs {
        store.prune(&tab.name, SNAPSHOT_KEEP)?;
    }
    store.prune("market", SNAPSHOT_KEEP)?;

    info!("all done");
    Ok(())
}
