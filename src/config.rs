// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::{env, fs};

/// Environment variable that overrides the vendor API key from the file.
pub const API_KEY_ENV: &str = "FOLIOFEED_API_KEY";

/// One tab of the portfolio spreadsheet.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetTab {
    /// Dataset name; also the snapshot key (e.g. "holdings").
    pub name: String,
    /// The tab's gid in the spreadsheet.
    pub gid: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Pause between per-ticker calls, in milliseconds.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub spreadsheet_id: String,
    pub tabs: Vec<SheetTab>,
    pub vendor: VendorConfig,
    /// Earnings-summary service; summaries are skipped when unset.
    #[serde(default)]
    pub summarizer: Option<SummarizerConfig>,
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
    /// Dataset whose key column lists the tickers to enrich.
    #[serde(default = "default_holdings_tab")]
    pub holdings_tab: String,
}

fn default_throttle_ms() -> u64 {
    60
}

fn default_snapshot_dir() -> String {
    "snapshots".to_string()
}

fn default_holdings_tab() -> String {
    "holdings".to_string()
}

impl Config {
    /// Load the YAML config file, letting [`API_KEY_ENV`] override the key
    /// so it can stay out of the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if let Ok(key) = env::var(API_KEY_ENV) {
            config.vendor.api_key = key;
        }
        Ok(config)
    }
}
