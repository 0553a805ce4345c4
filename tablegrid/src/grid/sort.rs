use crate::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ascending comparison of two cells. Nulls come first, then values that
/// read as numbers (compared numerically), then everything else as
/// lowercase strings. The order is total on mixed columns.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (sort_class(a), sort_class(b)) {
        (SortClass::Numeric(x), SortClass::Numeric(y)) => x.total_cmp(&y),
        (SortClass::Text, SortClass::Text) => a
            .to_display_string()
            .to_lowercase()
            .cmp(&b.to_display_string().to_lowercase()),
        (left, right) => left.rank().cmp(&right.rank()),
    }
}

enum SortClass {
    Null,
    Numeric(f64),
    Text,
}

impl SortClass {
    fn rank(&self) -> u8 {
        match self {
            SortClass::Null => 0,
            SortClass::Numeric(_) => 1,
            SortClass::Text => 2,
        }
    }
}

fn sort_class(value: &CellValue) -> SortClass {
    if value.is_null() {
        return SortClass::Null;
    }
    match value.numeric_value() {
        Some(n) => SortClass::Numeric(n),
        None => SortClass::Text,
    }
}

/// Compare two pre-read rows of sort values under the given directions.
pub(super) fn compare_keyed(a: &[CellValue], b: &[CellValue], directions: &[SortDirection]) -> Ordering {
    for ((left, right), direction) in a.iter().zip(b).zip(directions) {
        let ord = compare_cells(left, right);
        let ord = match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
