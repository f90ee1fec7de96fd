// src/sheet/locate.rs

use super::parse::{clean_cell, RawTable};

/// How many of the top rows are scanned for a header row.
const HEADER_SCAN_ROWS: usize = 10;
/// How many rows below the header are scanned for the first data row.
const DATA_SCAN_ROWS: usize = 15;

/// A row whose first cell mentions one of these is the header row.
const HEADER_MARKERS: &[&str] = &["ticker", "company", "symbol"];
/// First-cell keywords that mark a summary/total line. Reaching one ends the
/// data region for good.
const SUMMARY_MARKERS: &[&str] = &["median", "min", "max", "sum"];
/// First-cell keywords that disqualify a row as the start of data.
const NON_DATA_MARKERS: &[&str] = &["general", "information", "median", "min", "max", "sum"];

/// Key-column values longer than this are assumed to be prose, not tickers.
const MAX_KEY_LEN: usize = 10;

/// Find the row holding column names: the first of the top rows whose first
/// cell mentions ticker/company/symbol, case-insensitively.
///
/// Falls back to row 0 when nothing matches so the rest of the pipeline still
/// produces output for header-less exports. Fail-open on purpose: the
/// dashboard always gets *something* to render.
pub fn header_row(table: &RawTable) -> usize {
    let limit = table.rows.len().min(HEADER_SCAN_ROWS);
    for idx in 0..limit {
        let first = table.first_cell(idx).to_lowercase();
        if HEADER_MARKERS.iter().any(|m| first.contains(m)) {
            return idx;
        }
    }
    0
}

/// The row of group labels sits directly above the header row, when there is
/// room for one.
pub fn category_row(header_row: usize) -> Option<usize> {
    if header_row > 0 {
        Some(header_row - 1)
    } else {
        None
    }
}

/// First plausible data row strictly below the header: non-empty key cell,
/// no summary/meta keyword, and short enough to be a ticker or name.
///
/// Falls back to the row right under the header when the scan window finds
/// nothing.
pub fn data_start_row(table: &RawTable, header_row: usize) -> usize {
    let from = header_row + 1;
    let to = table.rows.len().min(from + DATA_SCAN_ROWS);
    for idx in from..to {
        let first = clean_cell(table.first_cell(idx));
        if first.is_empty() {
            continue;
        }
        let lower = first.to_lowercase();
        if NON_DATA_MARKERS.iter().any(|m| lower.contains(m)) {
            continue;
        }
        if first.chars().count() >= MAX_KEY_LEN {
            continue;
        }
        return idx;
    }
    from
}

/// True when a cleaned, lower-cased key cell reads like a summary line.
pub(crate) fn is_summary_marker(lower_first_cell: &str) -> bool {
    SUMMARY_MARKERS.iter().any(|m| lower_first_cell.contains(m))
}
