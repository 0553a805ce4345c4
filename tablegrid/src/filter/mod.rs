// Active column filters: value types, the descriptor store, and the
// persisted wire shape.

mod eval;

pub use eval::{coerce_number, passes_filter, passes_all, wei_to_token};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The current constraint on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireValue", into = "WireValue")]
pub enum FilterValue {
    /// Case-insensitive substring match. Empty means no constraint.
    Text(String),
    /// Row passes if its stringified value is in the set. Empty set means no constraint.
    MultiFacet(BTreeSet<String>),
    /// Inclusive numeric bounds, either optional.
    Range { min: Option<f64>, max: Option<f64> },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn facets<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::MultiFacet(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        FilterValue::Range { min, max }
    }

    /// True when the value constrains nothing.
    pub fn is_inactive(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::MultiFacet(values) => values.is_empty(),
            FilterValue::Range { min, max } => bound(*min).is_none() && bound(*max).is_none(),
        }
    }
}

/// A bound is only set when it is a real number.
pub(crate) fn bound(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// On-disk shape of a filter value. The marker fields discriminate the
/// variants inside plain JSON.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireValue {
    Text(String),
    Multi {
        #[serde(rename = "__multi")]
        multi: bool,
        values: Vec<String>,
    },
    Range {
        #[serde(rename = "__range")]
        range: bool,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl TryFrom<WireValue> for FilterValue {
    type Error = String;

    fn try_from(wire: WireValue) -> Result<Self, Self::Error> {
        match wire {
            WireValue::Text(s) => Ok(FilterValue::Text(s)),
            WireValue::Multi { multi: true, values } => {
                Ok(FilterValue::MultiFacet(values.into_iter().collect()))
            }
            WireValue::Range { range: true, min, max } => Ok(FilterValue::Range { min, max }),
            _ => Err("filter value marker must be true".to_string()),
        }
    }
}

impl From<FilterValue> for WireValue {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::Text(s) => WireValue::Text(s),
            FilterValue::MultiFacet(values) => WireValue::Multi {
                multi: true,
                values: values.into_iter().collect(),
            },
            FilterValue::Range { min, max } => WireValue::Range {
                range: true,
                min: bound(min),
                max: bound(max),
            },
        }
    }
}

/// One active filter, keyed by column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub id: String,
    pub value: FilterValue,
}

impl FilterDescriptor {
    pub fn new(id: impl Into<String>, value: FilterValue) -> Self {
        FilterDescriptor {
            id: id.into(),
            value,
        }
    }
}

/// The active filter list. Holds at most one descriptor per column and
/// keeps insertion order for persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterStore {
    descriptors: Vec<FilterDescriptor>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value of an existing descriptor in place, or append.
    pub fn upsert(&mut self, column_id: &str, value: FilterValue) {
        match self.descriptors.iter_mut().find(|d| d.id == column_id) {
            Some(existing) => existing.value = value,
            None => self
                .descriptors
                .push(FilterDescriptor::new(column_id, value)),
        }
    }

    /// Drop the descriptor for one column. Returns whether one was present.
    pub fn remove(&mut self, column_id: &str) -> bool {
        let before = self.descriptors.len();
        self.descriptors.retain(|d| d.id != column_id);
        self.descriptors.len() != before
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    /// Bulk replace. Duplicate ids collapse onto the first position with
    /// the last value.
    pub fn set_all(&mut self, list: Vec<FilterDescriptor>) {
        self.descriptors.clear();
        for descriptor in list {
            self.upsert(&descriptor.id, descriptor.value);
        }
    }

    pub fn get(&self, column_id: &str) -> Option<&FilterValue> {
        self.descriptors
            .iter()
            .find(|d| d.id == column_id)
            .map(|d| &d.value)
    }

    pub fn as_slice(&self) -> &[FilterDescriptor] {
        &self.descriptors
    }

    pub fn to_vec(&self) -> Vec<FilterDescriptor> {
        self.descriptors.clone()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl From<Vec<FilterDescriptor>> for FilterStore {
    fn from(list: Vec<FilterDescriptor>) -> Self {
        let mut store = FilterStore::new();
        store.set_all(list);
        store
    }
}
