// src/fetch/summary.rs

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;

/// One earnings call to summarize.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest<'a> {
    pub ticker: &'a str,
    pub transcript: &'a str,
    /// Display label, e.g. "Q3 2026".
    pub quarter: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

/// Ask the summarization service for a plain-text digest of one earnings
/// call. The service is a black box: transcript in, summary out.
pub async fn summarize(
    client: &Client,
    config: &SummarizerConfig,
    request: &SummaryRequest<'_>,
) -> Result<String> {
    let response = client
        .post(&config.url)
        .json(request)
        .send()
        .await
        .with_context(|| format!("POST {}", config.url))?
        .error_for_status()
        .with_context(|| format!("summarizer error status for {}", request.ticker))?
        .json::<SummaryResponse>()
        .await
        .with_context(|| format!("decoding summary for {}", request.ticker))?;
    Ok(response.summary)
}
