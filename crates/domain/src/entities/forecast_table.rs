//! Forecast tables and their column-oriented payload form
//!
//! A [`ForecastTable`] is row-oriented while it is being built and capped.
//! [`TablePayload`] is the transposed `{column: [values...]}` mapping that
//! is cached and returned to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::errors::DomainError;
use crate::value_objects::format_timestamp;

/// Name of the date column present in every forecast table
pub const DATE_COLUMN: &str = "Date";

/// Name of the only column in an error payload
pub const ERROR_COLUMN: &str = "error";

/// A single table value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Point in time, rendered as a string in payloads
    Timestamp(DateTime<Utc>),
    /// Numeric measurement; `NaN` marks a missing upstream value
    Number(f64),
}

impl Cell {
    /// Numeric value, if this is a number cell
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Timestamp(_) => None,
        }
    }

    /// Timestamp value, if this is a timestamp cell
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            Self::Number(_) => None,
        }
    }

    /// JSON representation used in payloads
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Timestamp(ts) => Value::String(format_timestamp(ts)),
            // NaN has no JSON number form and becomes null
            Self::Number(n) => Value::from(*n),
        }
    }
}

/// One labeled record of a forecast table
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    cells: Vec<Cell>,
}

/// Ordered, named-column forecast table
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    columns: Vec<String>,
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Create an empty table with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the row width differs from the column count.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<(), DomainError> {
        if cells.len() != self.columns.len() {
            return Err(DomainError::shape_mismatch(self.columns.len(), cells.len()));
        }
        self.rows.push(ForecastRow { cells });
        Ok(())
    }

    /// Keep at most `cap` leading rows
    pub fn truncate(&mut self, cap: usize) {
        self.rows.truncate(cap);
    }

    /// Column names in order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of a column, top to bottom
    ///
    /// # Errors
    ///
    /// Returns `MissingVariable` if the column does not exist.
    pub fn column(&self, name: &str) -> Result<Vec<Cell>, DomainError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DomainError::MissingVariable(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row.cells[idx]).collect())
    }

    /// Numeric values of a column; non-numeric cells become `NaN`
    ///
    /// # Errors
    ///
    /// Returns `MissingVariable` if the column does not exist.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, DomainError> {
        Ok(self
            .column(name)?
            .iter()
            .map(|c| c.as_number().unwrap_or(f64::NAN))
            .collect())
    }

    /// Transpose into the column-oriented payload form
    #[must_use]
    pub fn to_payload(&self) -> TablePayload {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values = self.rows.iter().map(|row| row.cells[idx].to_json()).collect();
                (name.clone(), values)
            })
            .collect();
        TablePayload { columns }
    }
}

/// Column-oriented `{column: [v0, v1, ...]}` mapping with stable column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TablePayload {
    columns: Vec<(String, Vec<Value>)>,
}

impl TablePayload {
    /// Build a payload from ordered columns
    #[must_use]
    pub fn from_columns(columns: Vec<(String, Vec<Value>)>) -> Self {
        Self { columns }
    }

    /// The uniform error shape `{"error": [message]}`
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            columns: vec![(
                ERROR_COLUMN.to_string(),
                vec![Value::String(message.into())],
            )],
        }
    }

    /// Whether this payload carries an error message
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.columns.len() == 1 && self.columns[0].0 == ERROR_COLUMN
    }

    /// Error message, if this is an error payload
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.columns[0].1.first().and_then(Value::as_str)
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Values of a column
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (length of the first column)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }
}

impl Serialize for TablePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = TablePayload;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of column names to value arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, values)) = access.next_entry::<String, Vec<Value>>()? {
            columns.push((name, values));
        }
        Ok(TablePayload { columns })
    }
}

impl<'de> Deserialize<'de> for TablePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PayloadVisitor)
    }
}
