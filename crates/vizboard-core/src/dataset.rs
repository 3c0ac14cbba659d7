//! Tabular dataset import (JSON and CSV), column type inference and default chart bindings.

use crate::record::{FieldType, Record, Scalar};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

/// Imported rows plus the column metadata derived from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub data: Vec<Record>,
    pub columns: Vec<String>,
    pub data_types: IndexMap<String, FieldType>,
}

impl Table {
    pub fn new(data: Vec<Record>, columns: Vec<String>) -> Self {
        let data_types = infer_field_types(&columns, &data);
        Self {
            data,
            columns,
            data_types,
        }
    }

    /// Parses JSON text into a table. See [`Table::from_json_value`] for the accepted shapes.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Accepts a top-level array of objects, an object whose first array-valued property holds
    /// the rows, or a single object (treated as a one-row table).
    ///
    /// Columns are the keys of the first row.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let rows = match value {
            Value::Array(rows) => rows,
            Value::Object(mut map) => {
                let array_key = map
                    .iter()
                    .find(|(_, v)| v.is_array())
                    .map(|(k, _)| k.clone());
                let rows = match array_key.and_then(|k| map.shift_remove(&k)) {
                    Some(Value::Array(rows)) => rows,
                    _ => Vec::new(),
                };
                if rows.is_empty() {
                    vec![Value::Object(map)]
                } else {
                    rows
                }
            }
            other => {
                return Err(Error::DatasetImport {
                    format: "json".to_string(),
                    message: format!("expected an array or object, got {other}"),
                });
            }
        };

        let columns: Vec<String> = match rows.first() {
            Some(Value::Object(first)) => first.keys().cloned().collect(),
            _ => Vec::new(),
        };

        let total = rows.len();
        let data: Vec<Record> = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(Record::from(
                    map.into_iter().collect::<IndexMap<String, Value>>(),
                )),
                _ => None,
            })
            .collect();
        if data.len() != total {
            tracing::debug!(
                skipped = total - data.len(),
                "skipping non-object rows in JSON dataset"
            );
        }
        tracing::debug!(rows = data.len(), columns = columns.len(), "imported JSON dataset");
        Ok(Self::new(data, columns))
    }

    /// Reads a headered CSV document, converting each cell the way a dynamically typed CSV
    /// parser would: numbers, `true`/`false`, ISO 8601 date-times, empty cells as absent, and
    /// everything else as text.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(Error::DatasetImport {
                format: "csv".to_string(),
                message: "missing header row".to_string(),
            });
        }

        let mut data = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let record: Record = columns
                .iter()
                .zip(row.iter())
                .filter_map(|(col, cell)| csv_cell(cell).map(|v| (col.clone(), v)))
                .collect();
            data.push(record);
        }
        tracing::debug!(rows = data.len(), columns = columns.len(), "imported CSV dataset");
        Ok(Self::new(data, columns))
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv_reader(text.as_bytes())
    }

    pub fn default_dimensions(&self) -> DefaultDimensions {
        default_dimensions(&self.columns, &self.data_types)
    }
}

fn csv_cell(cell: &str) -> Option<Scalar> {
    if cell.is_empty() {
        return None;
    }
    match cell {
        "true" | "TRUE" => return Some(Scalar::Bool(true)),
        "false" | "FALSE" => return Some(Scalar::Bool(false)),
        _ => {}
    }
    if looks_numeric(cell) {
        if let Ok(v) = cell.trim().parse::<f64>() {
            return Some(Scalar::Number(v));
        }
    }
    if let Some(date) = parse_iso_datetime(cell) {
        return Some(Scalar::Date(date));
    }
    Some(Scalar::Text(cell.to_string()))
}

/// Plain decimal or exponent notation; rejects `inf`, `NaN` and hex that `f64::from_str` or
/// other parsers might accept.
fn looks_numeric(cell: &str) -> bool {
    let t = cell.trim();
    let t = t.strip_prefix('-').unwrap_or(t);
    let (mantissa, exponent) = match t.find(['e', 'E']) {
        Some(i) => (&t[..i], Some(&t[i + 1..])),
        None => (t, None),
    };
    let mut digits = 0;
    let mut dots = 0;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }
    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && e.chars().all(|c| c.is_ascii_digit())
        }
    }
}

fn parse_iso_datetime(cell: &str) -> Option<DateTime<Utc>> {
    if !cell.contains('T') {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(cell) {
        return Some(d.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|d| d.and_utc())
}

/// Infers one [`FieldType`] per column from the first record only.
///
/// A column the first record does not carry is typed `string`. An empty record slice yields an
/// empty map.
pub fn infer_field_types(columns: &[String], data: &[Record]) -> IndexMap<String, FieldType> {
    let Some(first) = data.first() else {
        return IndexMap::new();
    };
    columns
        .iter()
        .map(|col| {
            let ty = first
                .get(col)
                .map(Scalar::field_type)
                .unwrap_or(FieldType::String);
            (col.clone(), ty)
        })
        .collect()
}

/// Initial x/y bindings proposed for a new chart over a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultDimensions {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// x: the first non-numeric column (else the first column); y: the first numeric column (else
/// the second column, else the first).
pub fn default_dimensions(
    columns: &[String],
    data_types: &IndexMap<String, FieldType>,
) -> DefaultDimensions {
    let is_number = |col: &&String| data_types.get(col.as_str()) == Some(&FieldType::Number);
    let x = columns
        .iter()
        .find(|c| !is_number(c))
        .or_else(|| columns.first())
        .cloned();
    let y = columns
        .iter()
        .find(is_number)
        .or_else(|| columns.get(1))
        .or_else(|| columns.first())
        .cloned();
    DefaultDimensions { x, y }
}

/// A named, owned table as stored by a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
    pub data: Vec<Record>,
    pub columns: Vec<String>,
    pub data_types: IndexMap<String, FieldType>,
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>, table: Table) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
            owner_id: owner_id.into(),
            data: table.data,
            columns: table.columns,
            data_types: table.data_types,
            shared_with: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn from_json_str(
        name: impl Into<String>,
        owner_id: impl Into<String>,
        text: &str,
    ) -> Result<Self> {
        Ok(Self::new(name, owner_id, Table::from_json_str(text)?))
    }

    pub fn from_csv_reader<R: Read>(
        name: impl Into<String>,
        owner_id: impl Into<String>,
        reader: R,
    ) -> Result<Self> {
        Ok(Self::new(name, owner_id, Table::from_csv_reader(reader)?))
    }

    pub fn default_dimensions(&self) -> DefaultDimensions {
        default_dimensions(&self.columns, &self.data_types)
    }
}
