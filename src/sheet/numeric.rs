// src/sheet/numeric.rs

use once_cell::sync::Lazy;
use regex::Regex;

use super::records::ERROR_TOKENS;

/// Currency/thousands/percent/multiple decorations, stripped wherever they
/// appear.
static DECORATIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$,\s%xX]").expect("decoration pattern should parse"));

/// Coerce a decorated sheet value into a float.
///
/// `"$1,234.50"` → `1234.5`, `"(12.3%)"` → `-12.3`, `"28.5x"` → `28.5`.
/// Parenthesized values are negative, accountant-style. Missing, blank,
/// `"-"`, formula-error, and non-numeric values all yield `None`; this never
/// fails on garbage input.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == "-" || ERROR_TOKENS.contains(&raw) {
        return None;
    }

    let stripped = DECORATIONS.replace_all(raw, "");
    let (body, negative) = match stripped
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (stripped.as_ref(), false),
    };

    let value: f64 = body.parse().ok()?;
    Some(if negative { -value } else { value })
}
