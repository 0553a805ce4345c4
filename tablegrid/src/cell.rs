// Cell values - the typed view of whatever an accessor reads out of a row

use std::collections::BTreeMap;

/// Integers below this magnitude survive an f64 round-trip exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single value read from a row by a column accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    /// Integer amounts that do not fit a float losslessly (token base units).
    BigInt(i128),
    Text(String),
    List(Vec<CellValue>),
    Object(BTreeMap<String, CellValue>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Stringify the value the way facet membership compares it.
    /// `Null` becomes the empty string; lists and objects become compact JSON.
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::BigInt(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::List(_) | CellValue::Object(_) => {
                serde_json::to_string(&self.to_json()).unwrap_or_default()
            }
        }
    }

    /// Best-effort plain numeric reading, used for ordering.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::BigInt(n) => Some(*n as f64),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Convert back into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(*b),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => {
                serde_json::Value::Number((*n as i64).into())
            }
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::BigInt(n) => {
                if let Ok(i) = i64::try_from(*n) {
                    serde_json::Value::Number(i.into())
                } else if let Ok(u) = u64::try_from(*n) {
                    serde_json::Value::Number(u.into())
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::List(items) => {
                serde_json::Value::Array(items.iter().map(CellValue::to_json).collect())
            }
            CellValue::Object(map) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in map {
                    obj.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(obj)
            }
        }
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Null),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            serde_json::Value::Array(arr) => {
                CellValue::List(arr.iter().map(CellValue::from).collect())
            }
            serde_json::Value::Object(map) => CellValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), CellValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(json: serde_json::Value) -> Self {
        CellValue::from(&json)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// A record the grid can search across without knowing its columns.
pub trait GridRow {
    /// The row's own top-level values, in field order.
    fn fields(&self) -> Vec<CellValue>;
}

impl GridRow for serde_json::Value {
    fn fields(&self) -> Vec<CellValue> {
        match self {
            serde_json::Value::Object(map) => map.values().map(CellValue::from).collect(),
            other => vec![CellValue::from(other)],
        }
    }
}

impl GridRow for BTreeMap<String, CellValue> {
    fn fields(&self) -> Vec<CellValue> {
        self.values().cloned().collect()
    }
}
