// src/bin/ingest_file.rs
//
// Run the sheet-normalization pipeline over a local CSV export and print the
// result as JSON. Handy for checking what the dashboard will see for a tab
// without touching the network.

use anyhow::{Context, Result};
use std::{env, fs};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: ingest_file <path-to-csv>")?;
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;

    let table = foliofeed::sheet::ingest(&text);
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}
