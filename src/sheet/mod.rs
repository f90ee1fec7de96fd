// src/sheet/mod.rs

pub mod categories;
pub mod locate;
pub mod numeric;
pub mod parse;
pub mod records;

pub use categories::build_category_map;
pub use numeric::parse_numeric;
pub use parse::{clean_cell, parse, RawTable};
pub use records::{build_records, Record};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One normalized dataset: the column-group map plus the data rows in sheet
/// order. This is the shape the dashboard consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTable {
    /// Header name → column group, in header order.
    pub categories: IndexMap<String, String>,
    pub records: Vec<Record>,
}

impl SheetTable {
    /// Non-empty values of the key column (the first header), in sheet order.
    /// For the holdings tab these are the tickers to enrich.
    pub fn key_column_values(&self) -> Vec<String> {
        let Some(key) = self.categories.keys().next() else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter_map(|record| record.get(key))
            .filter(|value| !value.is_empty())
            .cloned()
            .collect()
    }
}

/// Run the full normalization pipeline over one exported tab.
///
/// Always produces a table: missing structure falls back to documented
/// defaults (row 0 as headers, "Other" as the column group) instead of
/// erroring, so a half-broken sheet still renders.
pub fn ingest(csv_text: &str) -> SheetTable {
    let table = parse::parse(csv_text);
    let header_row = locate::header_row(&table);
    let category_row = locate::category_row(header_row);
    let categories = categories::build_category_map(&table, header_row, category_row);
    let records = records::build_records(&table, header_row);
    SheetTable {
        categories,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pipeline_on_a_small_holdings_tab() {
        let csv = ",Valuation,\nTicker,P/E,Market Cap\nAAPL,28.5,3500000\nSUM,,\n";
        let table = ingest(csv);

        assert_eq!(table.categories.len(), 3);
        assert_eq!(table.categories["Ticker"], "Other");
        assert_eq!(table.categories["P/E"], "Valuation");
        assert_eq!(table.categories["Market Cap"], "Valuation");

        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0]["Ticker"], "AAPL");
        assert_eq!(table.records[0]["P/E"], "28.5");
        assert_eq!(table.records[0]["Market Cap"], "3500000");
    }

    #[test]
    fn preamble_rows_above_the_category_row_are_ignored() {
        let csv = "My Portfolio,,\n,Valuation,Growth\nTicker,P/E,Rev CAGR\nAAPL,28.5,8%\n";
        let table = ingest(csv);
        assert_eq!(table.categories["P/E"], "Valuation");
        assert_eq!(table.categories["Rev CAGR"], "Growth");
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn headerless_export_still_yields_a_table() {
        // Fail-open: no ticker/company/symbol marker anywhere, so row 0 is
        // treated as the header row and everything groups under "Other".
        let csv = "alpha,beta\nAAA,1\nBBB,2\n";
        let table = ingest(csv);
        assert_eq!(table.categories["alpha"], "Other");
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1]["alpha"], "BBB");
    }

    #[test]
    fn key_column_values_lists_tickers_in_sheet_order() {
        let csv = "Ticker,P/E\nAAPL,28.5\nMSFT,32.1\nGOOG,24.0\n";
        let table = ingest(csv);
        assert_eq!(table.key_column_values(), vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn empty_input_yields_an_empty_table() {
        let table = ingest("");
        assert!(table.categories.is_empty());
        assert!(table.records.is_empty());
    }

    #[test]
    fn sheet_table_round_trips_through_json_preserving_order() {
        let csv = ",Valuation,\nTicker,P/E,Market Cap\nAAPL,28.5,3500000\n";
        let table = ingest(csv);
        let json = serde_json::to_string(&table).expect("serialize");
        let back: SheetTable = serde_json::from_str(&json).expect("deserialize");
        let keys: Vec<&str> = back.categories.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Ticker", "P/E", "Market Cap"]);
    }
}
