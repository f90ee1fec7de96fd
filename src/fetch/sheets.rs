// src/fetch/sheets.rs

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use futures::future::join_all;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use url::Url;

use crate::cache::SheetCache;
use crate::config::{Config, SheetTab};
use crate::sheet::{self, SheetTable};

static EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// How long a fetched CSV body stays fresh in the cache.
const CACHE_TTL_SECS: i64 = 300;

/// CSV export URL for one tab of a spreadsheet.
pub fn export_url(spreadsheet_id: &str, gid: u64) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/{}/export", EXPORT_BASE, spreadsheet_id))
        .with_context(|| format!("building export URL for spreadsheet {}", spreadsheet_id))?;
    url.query_pairs_mut()
        .append_pair("format", "csv")
        .append_pair("gid", &gid.to_string());
    Ok(url)
}

/// Fetch one tab's CSV body. A single GET with no retry: a flaky export
/// surfaces to the caller, which logs it and moves on.
pub async fn fetch_csv(client: &Client, spreadsheet_id: &str, tab: &SheetTab) -> Result<String> {
    let url = export_url(spreadsheet_id, tab.gid)?;
    let body = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {}", url))?;
    Ok(body)
}

/// Fetch a tab's body through the cache. An entry older than the TTL is
/// refetched; two racing callers may both refetch, last write wins.
pub async fn fetch_csv_cached(
    client: &Client,
    spreadsheet_id: &str,
    tab: &SheetTab,
    cache: &SheetCache,
) -> Result<String> {
    let now = Utc::now();
    if let Some(entry) = cache.get(&tab.name) {
        if entry.is_fresh(Duration::seconds(CACHE_TTL_SECS), now) {
            debug!(tab = %tab.name, "cache hit");
            return Ok(entry.value);
        }
    }

    let body = fetch_csv(client, spreadsheet_id, tab).await?;
    cache.put(&tab.name, body.clone(), now);
    Ok(body)
}

/// Fetch and normalize every configured tab concurrently.
///
/// Tabs resolve in no particular order and each body is ingested
/// independently as it lands. A tab that fails to load is logged and left
/// out; the others still come back, so the dashboard renders what it can.
pub async fn fetch_all_datasets(
    client: &Client,
    config: &Config,
    cache: &SheetCache,
) -> BTreeMap<String, SheetTable> {
    let fetches = config.tabs.iter().map(|tab| async move {
        match fetch_csv_cached(client, &config.spreadsheet_id, tab, cache).await {
            Ok(body) => Some((tab.name.clone(), sheet::ingest(&body))),
            Err(err) => {
                warn!(tab = %tab.name, error = %err, "failed to load dataset");
                None
            }
        }
    });

    join_all(fetches).await.into_iter().flatten().collect()
}
