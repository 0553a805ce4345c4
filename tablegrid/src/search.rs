use crate::cell::{CellValue, GridRow};

/// Flatten a row's top-level values, expanding nested objects exactly one
/// level deep.
pub fn flatten_row_values<R: GridRow + ?Sized>(row: &R) -> Vec<CellValue> {
    let mut out = Vec::new();
    for value in row.fields() {
        match value {
            CellValue::Object(map) => out.extend(map.into_values()),
            other => out.push(other),
        }
    }
    out
}

/// Free-text search across a whole row. Only string values are compared,
/// case-insensitively; an empty query matches everything.
pub fn matches_global<R: GridRow + ?Sized>(row: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    flatten_row_values(row).iter().any(|value| match value {
        CellValue::Text(text) => text.to_lowercase().contains(&needle),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_matches() {
        assert!(matches_global(&json!({"a": 1}), ""));
    }

    #[test]
    fn test_substring_not_exact() {
        let rows: Vec<serde_json::Value> = (1..=20)
            .map(|i| json!({ "name": format!("Row {i}") }))
            .collect();
        let hits: Vec<&serde_json::Value> =
            rows.iter().filter(|r| matches_global(*r, "17")).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["name"], "Row 17");
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches_global(&json!({"name": "Alpha Indexer"}), "alpha"));
        assert!(matches_global(&json!({"name": "alpha indexer"}), "ALPHA"));
    }

    #[test]
    fn test_one_level_of_nesting() {
        let row = json!({
            "id": 1,
            "indexer": { "url": "https://indexer.example", "deep": { "tag": "hidden" } },
        });
        assert!(matches_global(&row, "indexer.example"));
        assert!(!matches_global(&row, "hidden"));
    }

    #[test]
    fn test_non_strings_ignored() {
        let row = json!({"n": 17, "flag": true, "tags": ["seventeen"]});
        assert!(!matches_global(&row, "17"));
        assert!(!matches_global(&row, "true"));
        assert!(!matches_global(&row, "seventeen"));
    }
}
