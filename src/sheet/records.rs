// src/sheet/records.rs

use indexmap::IndexMap;

use super::locate;
use super::parse::{clean_cell, RawTable};

/// One normalized data row, keyed by header name in column order.
pub type Record = IndexMap<String, String>;

/// Spreadsheet formula-error tokens, normalized to empty values.
pub(crate) const ERROR_TOKENS: &[&str] = &["#N/A", "#DIV/0!", "#VALUE!", "#REF!"];

fn normalize_value(raw: &str) -> String {
    let cell = clean_cell(raw);
    if ERROR_TOKENS.contains(&cell.as_str()) {
        String::new()
    } else {
        cell
    }
}

/// Build one [`Record`] per data row, in sheet order.
///
/// Scanning halts for good at the first row whose key cell is blank or reads
/// like a summary line; sheet totals mark the end of the table, and rows
/// after them are never reached even if they look valid. A row whose key
/// value normalizes to empty (a lone error token, say) is dropped without
/// halting the scan. Cells past the end of a ragged row read as empty.
pub fn build_records(table: &RawTable, header_row: usize) -> Vec<Record> {
    let headers: Vec<String> = table
        .rows
        .get(header_row)
        .map(|row| row.iter().map(|c| clean_cell(c)).collect())
        .unwrap_or_default();

    let Some(key_header) = headers.iter().find(|h| !h.is_empty()).cloned() else {
        return Vec::new();
    };

    let start = locate::data_start_row(table, header_row);
    let mut records = Vec::new();

    for row in table.rows.iter().skip(start) {
        let first = clean_cell(row.first().map(String::as_str).unwrap_or(""));
        if first.is_empty() || locate::is_summary_marker(&first.to_lowercase()) {
            break;
        }

        let mut record = Record::new();
        for (idx, name) in headers.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let value = row.get(idx).map(|c| normalize_value(c)).unwrap_or_default();
            record.insert(name.clone(), value);
        }

        if record.get(&key_header).is_some_and(|v| !v.is_empty()) {
            records.push(record);
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse::parse;

    #[test]
    fn rows_map_header_names_to_values_in_order() {
        let table = parse("Ticker,P/E,Market Cap\nAAPL,28.5,3500000\nMSFT,32.1,3100000");
        let records = build_records(&table, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Ticker"], "AAPL");
        assert_eq!(records[0]["P/E"], "28.5");
        assert_eq!(records[1]["Ticker"], "MSFT");
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Ticker", "P/E", "Market Cap"]);
    }

    #[test]
    fn error_tokens_become_empty_values() {
        let table = parse("Ticker,A,B,C,D\nAAPL,#N/A,#DIV/0!,#VALUE!,#REF!");
        let records = build_records(&table, 0);
        assert_eq!(records.len(), 1);
        for key in ["A", "B", "C", "D"] {
            assert_eq!(records[0][key], "");
        }
    }

    #[test]
    fn summary_row_ends_the_scan_for_good() {
        let table = parse("Ticker,P/E\nAAPL,28.5\nSUM,60.6\nMSFT,32.1");
        let records = build_records(&table, 0);
        // MSFT sits below the totals row and must never appear.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Ticker"], "AAPL");
    }

    #[test]
    fn blank_key_cell_ends_the_scan_for_good() {
        let table = parse("Ticker,P/E\nAAPL,28.5\n,separator\nMSFT,32.1");
        let records = build_records(&table, 0);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn error_token_key_drops_the_row_but_scanning_continues() {
        let table = parse("Ticker,P/E\n#N/A,1.0\nMSFT,32.1");
        let records = build_records(&table, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Ticker"], "MSFT");
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let table = parse("Ticker,P/E,Market Cap\nAAPL,28.5");
        let records = build_records(&table, 0);
        assert_eq!(records[0]["Market Cap"], "");
    }
}
