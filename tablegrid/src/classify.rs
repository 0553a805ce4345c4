// Column classification and facet chips, computed from the unfiltered rows

use crate::cell::CellValue;
use crate::column::{ColumnDescriptor, ColumnKind};
use serde::Serialize;
use std::collections::HashMap;

/// Default number of facet chips per text column.
pub const DEFAULT_FACET_LIMIT: usize = 10;

/// A distinct text value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetEntry {
    pub value: String,
    pub count: usize,
}

/// The classification of one filterable column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnClass {
    pub id: String,
    /// `None` when the column is offered in neither filter UI.
    pub kind: Option<ColumnKind>,
    pub facets: Vec<FacetEntry>,
}

fn is_numeric_text(text: &str) -> bool {
    text.trim().parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Classify a single sample value.
pub fn classify_sample(sample: &CellValue) -> Option<ColumnKind> {
    match sample {
        CellValue::Number(_) | CellValue::BigInt(_) => Some(ColumnKind::Numeric),
        CellValue::Text(text) if is_numeric_text(text) => Some(ColumnKind::Numeric),
        CellValue::Text(_) => Some(ColumnKind::Text),
        _ => None,
    }
}

/// The first value that is neither null nor an empty string.
fn first_sample<T>(rows: &[T], column: &ColumnDescriptor<T>) -> Option<CellValue> {
    rows.iter().map(|row| column.value(row)).find(|value| match value {
        CellValue::Null => false,
        CellValue::Text(text) => !text.is_empty(),
        _ => true,
    })
}

/// Decide which filter UI a column belongs in. Declared kinds win over
/// sniffing; only the first usable sample is inspected otherwise.
pub fn classify_column<T>(rows: &[T], column: &ColumnDescriptor<T>) -> Option<ColumnKind> {
    if !column.filterable || column.excluded {
        return None;
    }
    if column.kind.is_some() {
        return column.kind;
    }
    first_sample(rows, column).as_ref().and_then(classify_sample)
}

/// Top-`limit` non-empty string values by descending count. Ties keep
/// first-seen order.
pub fn compute_facets<T>(
    rows: &[T],
    column: &ColumnDescriptor<T>,
    limit: usize,
) -> Vec<FacetEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FacetEntry> = Vec::new();

    for row in rows {
        let CellValue::Text(text) = column.value(row) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        match positions.get(&text) {
            Some(&idx) => entries[idx].count += 1,
            None => {
                positions.insert(text.clone(), entries.len());
                entries.push(FacetEntry {
                    value: text,
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order within equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

/// Classify every filterable column and attach facets to text columns.
pub fn classify_columns<T>(
    rows: &[T],
    columns: &[ColumnDescriptor<T>],
    facet_limit: usize,
) -> Vec<ColumnClass> {
    columns
        .iter()
        .filter(|column| column.filterable)
        .map(|column| {
            let kind = classify_column(rows, column);
            let facets = if kind == Some(ColumnKind::Text) && column.facets {
                compute_facets(rows, column, facet_limit)
            } else {
                Vec::new()
            };
            ColumnClass {
                id: column.id.clone(),
                kind,
                facets,
            }
        })
        .collect()
}
