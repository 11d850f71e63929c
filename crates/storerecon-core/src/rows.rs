use std::borrow::Cow;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single cell from an uploaded POS export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCell")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Coerce the cell to text. Numbers use their shortest decimal form
    /// (`12345.0` → `"12345"`, `1.5` → `"1.5"`).
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Empty => Cow::Borrowed(""),
        }
    }

    /// Build a cell from a raw CSV field: empty stays empty, numbers that
    /// render back to the same text become [`CellValue::Number`], everything
    /// else is kept verbatim.
    ///
    /// The round-trip rule keeps codes such as `"00123"` or twenty-digit
    /// terminal ids as text, where a float would lose digits.
    #[must_use]
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && n.to_string() == trimmed => CellValue::Number(n),
            _ => CellValue::Text(field.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Empty => serializer.serialize_none(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl From<RawCell> for CellValue {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Text(s) => CellValue::Text(s),
            RawCell::Number(n) => CellValue::Number(n),
            RawCell::Bool(b) => CellValue::Text(b.to_string()),
            RawCell::Null => CellValue::Empty,
        }
    }
}

/// One record from an export file: column name to cell value, in the
/// column order of the source file.
///
/// Order is part of the contract: the row matcher scans columns first to
/// last and stops at the first cell that resolves a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    cells: Vec<(String, CellValue)>,
}

impl ImportRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. A repeated column name replaces the earlier value
    /// in place, keeping its original position.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.cells.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.cells.push((column, value));
        }
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.push(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Cell values in column order.
    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ImportRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ImportRow::new();
        for (k, v) in iter {
            row.push(k, v);
        }
        row
    }
}

impl Serialize for ImportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImportRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = ImportRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping column names to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ImportRow, A::Error> {
                let mut row = ImportRow::new();
                while let Some((column, value)) = access.next_entry::<String, CellValue>()? {
                    row.push(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// Outcome of matching one [`ImportRow`] against the mapping table.
///
/// Both fields `None` means no store could be determined. That is an
/// expected outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub resolved_store_id: Option<i64>,
    pub resolved_store_name: Option<String>,
}

impl MatchResult {
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn resolved(store_id: i64, store_name: impl Into<String>) -> Self {
        Self {
            resolved_store_id: Some(store_id),
            resolved_store_name: Some(store_name.into()),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved_store_id.is_some()
    }
}
