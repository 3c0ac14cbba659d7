use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::cmp::Ordering;

/// A single cell value inside a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl Scalar {
    /// Converts a JSON value into a scalar. `null`, arrays and objects are absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric view of the value, following JavaScript's unary `+` coercion for the scalar kinds
    /// a dataset can hold. Non-finite results are treated as non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Date(d) => d.timestamp_millis() as f64,
            Self::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return None;
                }
                t.parse::<f64>().ok()?
            }
        };
        v.is_finite().then_some(v)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Number(_) => FieldType::Number,
            Self::Text(_) => FieldType::String,
            Self::Bool(_) => FieldType::Boolean,
            Self::Date(_) => FieldType::Date,
        }
    }

    /// Human readable form used by axis labels, legends and tooltips.
    ///
    /// Numbers are printed the way JavaScript's `Number#toString()` does (`10`, not `10.0`).
    pub fn display(&self) -> String {
        match self {
            Self::Number(v) => js_number_to_string(*v),
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn key(&self) -> DomainKey {
        match self {
            Self::Number(v) => {
                let v = if *v == 0.0 { 0.0 } else { *v };
                let bits = if v.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    v.to_bits()
                };
                DomainKey::Number(bits)
            }
            Self::Text(s) => DomainKey::Text(s.clone()),
            Self::Bool(b) => DomainKey::Bool(*b),
            Self::Date(d) => DomainKey::Date(d.timestamp_millis()),
        }
    }

    /// Ascending total order for sorting a column of mixed values.
    ///
    /// Values that coerce to numbers (see [`Scalar::as_f64`]) come first and compare numerically,
    /// so `"9"` sorts before `"10"` and `2` before `"3"`. Remaining text follows in lexical order,
    /// then non-finite numbers, which compare equal to each other.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => match (self, other) {
                    (Self::Text(a), Self::Text(b)) => a.cmp(b),
                    _ => Ordering::Equal,
                },
            })
    }

    fn sort_rank(&self) -> u8 {
        match (self.as_f64(), self) {
            (Some(_), _) => 0,
            (None, Self::Text(_)) => 1,
            (None, _) => 2,
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Date(d) => {
                serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

/// Hashable identity of a scalar, used to deduplicate categorical domains.
///
/// `1` and `"1"` are distinct keys, matching how an ordinal scale keys primitives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainKey {
    Number(u64),
    Text(String),
    Bool(bool),
    Date(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Boolean,
    Date,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

/// One row of a dataset: an ordered field-name → scalar mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Value>")]
pub struct Record(IndexMap<String, Scalar>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Scalar) -> Option<Scalar> {
        self.0.insert(field.into(), value)
    }

    /// Value for `field`, or `None` when the record does not carry it.
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, Value>> for Record {
    fn from(raw: IndexMap<String, Value>) -> Self {
        Self(
            raw.into_iter()
                .filter_map(|(k, v)| Scalar::from_json(&v).map(|s| (k, s)))
                .collect(),
        )
    }
}

impl FromIterator<(String, Scalar)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn js_number_to_string(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}
