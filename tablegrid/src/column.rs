use crate::cell::CellValue;
use crate::error::{GridError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Which quick-filter UI a column is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Numeric,
}

type Accessor<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Describes one column of a grid: how to read it and what it allows.
pub struct ColumnDescriptor<T> {
    pub id: String,
    accessor: Accessor<T>,
    pub filterable: bool,
    pub sortable: bool,
    /// Whether text columns get facet chips.
    pub facets: bool,
    /// Explicit classification. `None` means sniff a sample value.
    pub kind: Option<ColumnKind>,
    /// Declared as excluded from both filter UIs regardless of its values.
    pub excluded: bool,
}

impl<T> ColumnDescriptor<T> {
    pub fn new<F>(id: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        ColumnDescriptor {
            id: id.into(),
            accessor: Box::new(accessor),
            filterable: true,
            sortable: true,
            facets: true,
            kind: None,
            excluded: false,
        }
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn facets(mut self, facets: bool) -> Self {
        self.facets = facets;
        self
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = Some(kind);
        self.excluded = false;
        self
    }

    /// Keep the column out of the text and range filter UIs.
    pub fn exclude_from_filters(mut self) -> Self {
        self.kind = None;
        self.excluded = true;
        self
    }

    /// Read this column's value out of a row.
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}

impl ColumnDescriptor<serde_json::Value> {
    /// A column reading a top-level field of a JSON object row.
    pub fn field(name: &str) -> Self {
        let key = name.to_string();
        ColumnDescriptor::new(name, move |row: &serde_json::Value| {
            row.get(&key).map(CellValue::from).unwrap_or(CellValue::Null)
        })
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .field("facets", &self.facets)
            .field("kind", &self.kind)
            .field("excluded", &self.excluded)
            .finish()
    }
}

/// Reject column sets where two descriptors share an id.
pub fn check_unique_ids<T>(columns: &[ColumnDescriptor<T>]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.id.as_str()) {
            return Err(GridError::DuplicateColumn(column.id.clone()));
        }
    }
    Ok(())
}
