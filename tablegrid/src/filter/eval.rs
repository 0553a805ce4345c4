use super::{bound, FilterDescriptor, FilterValue};
use crate::cell::CellValue;
use crate::column::ColumnDescriptor;
use regex::Regex;
use std::sync::OnceLock;

/// Base units per whole token.
const WEI_PER_TOKEN: i128 = 1_000_000_000_000_000_000;

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?\d+$").expect("valid integer pattern"))
}

fn float_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid float pattern")
    })
}

/// Convert an integer amount in base units to whole tokens, rounded.
fn wei_amount_to_token(amount: i128) -> f64 {
    let whole = amount / WEI_PER_TOKEN;
    let rest = amount % WEI_PER_TOKEN;
    (whole as f64 + rest as f64 / WEI_PER_TOKEN as f64).round()
}

/// Normalize an integer-like string of base units into whole tokens.
/// Returns `None` for anything that is not a plain integer.
pub fn wei_to_token(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !integer_pattern().is_match(trimmed) {
        return None;
    }
    let value = match trimmed.parse::<i128>() {
        Ok(amount) => wei_amount_to_token(amount),
        // Too wide for i128; a float is still close enough to filter on
        Err(_) => (trimmed.parse::<f64>().ok()? / WEI_PER_TOKEN as f64).round(),
    };
    value.is_finite().then_some(value)
}

/// Parse the longest numeric prefix of a string ("12.5kg" reads as 12.5).
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let prefix = float_prefix_pattern().find(trimmed)?.as_str();
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Best-effort numeric reading of a cell for range filtering.
///
/// Numbers are used as-is. Integer-like strings and big integers are
/// treated as base-unit token amounts; other strings fall back to a
/// leading-number parse.
pub fn coerce_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => wei_to_token(s).or_else(|| parse_float_prefix(s)),
        CellValue::BigInt(amount) => Some(wei_amount_to_token(*amount)),
        _ => None,
    }
}

/// Decide whether one column value passes that column's filter.
/// A missing filter always passes.
pub fn passes_filter(value: &CellValue, filter: Option<&FilterValue>) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    match filter {
        FilterValue::Text(needle) => {
            if needle.is_empty() {
                return true;
            }
            match value {
                CellValue::Text(haystack) => {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                }
                // Text filters do not apply to non-string values
                _ => true,
            }
        }
        FilterValue::MultiFacet(values) => {
            values.is_empty() || values.contains(&value.to_display_string())
        }
        FilterValue::Range { min, max } => {
            let (min, max) = (bound(*min), bound(*max));
            if min.is_none() && max.is_none() {
                return true;
            }
            let Some(n) = coerce_number(value) else {
                return false;
            };
            min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
        }
    }
}

/// AND across every active filter. Filters naming unknown columns are ignored.
pub fn passes_all<T>(
    row: &T,
    columns: &[ColumnDescriptor<T>],
    filters: &[FilterDescriptor],
) -> bool {
    filters.iter().all(|descriptor| {
        match columns.iter().find(|c| c.id == descriptor.id) {
            Some(column) => passes_filter(&column.value(row), Some(&descriptor.value)),
            None => true,
        }
    })
}
