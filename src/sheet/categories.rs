// src/sheet/categories.rs

use indexmap::IndexMap;

use super::parse::{clean_cell, RawTable};

/// Columns with no group label of their own land here.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Map every header cell to its column group.
///
/// Merged group cells export as one label followed by empty cells, so the
/// walk carries the most recent non-empty category cell forward until the
/// next one appears. Without a category row every header lands in
/// [`DEFAULT_CATEGORY`]. Duplicate header text keeps the last mapping seen.
pub fn build_category_map(
    table: &RawTable,
    header_row: usize,
    category_row: Option<usize>,
) -> IndexMap<String, String> {
    let empty: &[String] = &[];
    let headers = table.rows.get(header_row).map(Vec::as_slice).unwrap_or(empty);
    let mut map = IndexMap::new();

    let Some(category_row) = category_row else {
        for cell in headers {
            let name = clean_cell(cell);
            if !name.is_empty() {
                map.insert(name, DEFAULT_CATEGORY.to_string());
            }
        }
        return map;
    };

    let labels = table.rows.get(category_row).map(Vec::as_slice).unwrap_or(empty);
    let mut current = DEFAULT_CATEGORY.to_string();

    for idx in 0..labels.len().max(headers.len()) {
        let label = labels.get(idx).map(|c| clean_cell(c)).unwrap_or_default();
        if !label.is_empty() {
            current = label;
        }
        let name = headers.get(idx).map(|c| clean_cell(c)).unwrap_or_default();
        if !name.is_empty() {
            map.insert(name, current.clone());
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse::parse;

    #[test]
    fn labels_cover_following_columns_until_the_next_label() {
        let table = parse("Valuation,,,Growth,\nP/E,P/FCF,PEG,Rev CAGR,Margin");
        let map = build_category_map(&table, 1, Some(0));
        assert_eq!(map["P/E"], "Valuation");
        assert_eq!(map["P/FCF"], "Valuation");
        assert_eq!(map["PEG"], "Valuation");
        assert_eq!(map["Rev CAGR"], "Growth");
        assert_eq!(map["Margin"], "Growth");
    }

    #[test]
    fn columns_before_the_first_label_default_to_other() {
        let table = parse(",Valuation,\nTicker,P/E,Market Cap");
        let map = build_category_map(&table, 1, Some(0));
        assert_eq!(map["Ticker"], "Other");
        assert_eq!(map["P/E"], "Valuation");
        assert_eq!(map["Market Cap"], "Valuation");
    }

    #[test]
    fn missing_category_row_maps_everything_to_other() {
        let table = parse("Ticker,P/E,Margin");
        let map = build_category_map(&table, 0, None);
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|c| c == "Other"));
    }

    #[test]
    fn header_row_longer_than_category_row_is_fully_covered() {
        let table = parse("Valuation\nP/E,P/FCF,PEG");
        let map = build_category_map(&table, 1, Some(0));
        assert_eq!(map.len(), 3);
        assert!(map.values().all(|c| c == "Valuation"));
    }

    #[test]
    fn empty_header_cells_are_not_mapped() {
        let table = parse("Valuation,,\nP/E,,PEG");
        let map = build_category_map(&table, 1, Some(0));
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("P/E"));
        assert!(map.contains_key("PEG"));
    }

    #[test]
    fn insertion_order_follows_the_header_row() {
        let table = parse(",Valuation,\nTicker,P/E,Market Cap");
        let map = build_category_map(&table, 1, Some(0));
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Ticker", "P/E", "Market Cap"]);
    }
}
