// src/sheet/parse.rs

/// One exported sheet tab, split into rows of string cells.
///
/// Rows may be ragged: a data row can carry fewer cells than the header row.
/// Every call to [`parse`] builds a fresh table; nothing is shared or mutated
/// in place.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// First cell of row `idx`, or `""` when the row is short or absent.
    pub fn first_cell(&self, idx: usize) -> &str {
        self.rows
            .get(idx)
            .and_then(|row| row.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Split raw CSV text into rows of whitespace-trimmed cells.
///
/// A double-quote always toggles the in-quotes flag and is consumed, so a
/// comma inside a quoted span is literal content rather than a delimiter.
/// Doubled quotes are not collapsed; sheet exports don't need full RFC 4180.
/// Blank lines are discarded. Never fails: malformed text still yields some
/// table, possibly ragged.
pub fn parse(text: &str) -> RawTable {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect();
    RawTable { rows }
}

fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current).trim().to_string());
            }
            _ => current.push(ch),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Trim whitespace + strip outer quotes if present.
///
/// Cells coming out of [`parse`] have already had their quotes consumed, but
/// header names and values also reach the pipeline from other paths, so every
/// stage cleans what it reads.
pub fn clean_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_comma_is_literal_content() {
        let table = parse("A,\"B,C\",D");
        assert_eq!(table.rows, vec![vec!["A", "B,C", "D"]]);
    }

    #[test]
    fn blank_lines_are_discarded() {
        let table = parse("A,B\n\n   \nC,D\n");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["C", "D"]);
    }

    #[test]
    fn rows_may_be_ragged() {
        let table = parse("A,B,C\nD\n");
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[1].len(), 1);
    }

    #[test]
    fn cells_are_trimmed() {
        let table = parse("  A ,  B  ");
        assert_eq!(table.rows, vec![vec!["A", "B"]]);
    }

    #[test]
    fn unterminated_quote_is_best_effort() {
        // The trailing quote never closes; the rest of the line is one cell.
        let table = parse("A,\"B,C");
        assert_eq!(table.rows, vec![vec!["A", "B,C"]]);
    }

    #[test]
    fn first_cell_of_missing_row_is_empty() {
        let table = parse("A,B");
        assert_eq!(table.first_cell(0), "A");
        assert_eq!(table.first_cell(5), "");
    }

    #[test]
    fn clean_cell_strips_outer_quotes() {
        assert_eq!(clean_cell("  \"Market Cap\"  "), "Market Cap");
        assert_eq!(clean_cell("plain"), "plain");
        assert_eq!(clean_cell("\""), "\"");
    }
}
