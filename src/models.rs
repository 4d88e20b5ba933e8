use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of a query result.
///
/// Serialized untagged so the JSON shape of a result row (`null`, `12`, `1.5`,
/// `"OCAK"`) maps straight onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            CellValue::Int(i) => Some(i as f64),
            CellValue::Float(f) if f.is_finite() => Some(f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text form used by the heuristics that look at raw cell text.
    ///
    /// Integral floats keep one decimal (`2023.0`), so a float column never passes
    /// for a column of 4-digit years.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{:.1}", f)
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
        }
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

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Convenience for building text columns in tests and demos.
    pub fn text<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::new(
            name,
            values
                .iter()
                .map(|s| CellValue::Text(s.as_ref().to_string()))
                .collect(),
        )
    }

    pub fn non_null(&self) -> impl Iterator<Item = &CellValue> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// True when the column holds at least one value and every non-null value is numeric.
    pub fn is_numeric(&self) -> bool {
        let mut any = false;
        for v in self.non_null() {
            if !v.is_numeric() {
                return false;
            }
            any = true;
        }
        any
    }
}

/// Tabular query result: ordered columns of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultTable {
    columns: Vec<Column>,
}

impl ResultTable {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for c in &columns {
                if c.values.len() != expected {
                    return Err(Error::RaggedTable {
                        column: c.name.clone(),
                        expected,
                        found: c.values.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column lookup ignoring case (`yil` finds `YIL`).
    pub fn column_ci(&self, name: &str) -> Option<&Column> {
        let wanted = name.to_uppercase();
        self.columns.iter().find(|c| c.name.to_uppercase() == wanted)
    }

    /// Keep only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: rows
                    .iter()
                    .map(|&r| c.values.get(r).cloned().unwrap_or_default())
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    /// Replace the column with the same name, keeping its position.
    pub(crate) fn replace_column(&mut self, column: Column) {
        if let Some(slot) = self.columns.iter_mut().find(|c| c.name == column.name) {
            *slot = column;
        }
    }
}

/// The twelve calendar months, spelled the way the data spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanonicalMonth {
    Ocak,
    Subat,
    Mart,
    Nisan,
    Mayis,
    Haziran,
    Temmuz,
    Agustos,
    Eylul,
    Ekim,
    Kasim,
    Aralik,
}

impl CanonicalMonth {
    /// Calendar order.
    pub const ALL: [CanonicalMonth; 12] = [
        CanonicalMonth::Ocak,
        CanonicalMonth::Subat,
        CanonicalMonth::Mart,
        CanonicalMonth::Nisan,
        CanonicalMonth::Mayis,
        CanonicalMonth::Haziran,
        CanonicalMonth::Temmuz,
        CanonicalMonth::Agustos,
        CanonicalMonth::Eylul,
        CanonicalMonth::Ekim,
        CanonicalMonth::Kasim,
        CanonicalMonth::Aralik,
    ];

    /// 1-based calendar position, used as the x-axis sort key.
    pub fn position(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_position(pos: u32) -> Option<Self> {
        Self::ALL.get(pos.checked_sub(1)? as usize).copied()
    }

    /// Canonical label, upper case with Turkish letters.
    pub fn name(self) -> &'static str {
        match self {
            CanonicalMonth::Ocak => "OCAK",
            CanonicalMonth::Subat => "ŞUBAT",
            CanonicalMonth::Mart => "MART",
            CanonicalMonth::Nisan => "NİSAN",
            CanonicalMonth::Mayis => "MAYIS",
            CanonicalMonth::Haziran => "HAZİRAN",
            CanonicalMonth::Temmuz => "TEMMUZ",
            CanonicalMonth::Agustos => "AĞUSTOS",
            CanonicalMonth::Eylul => "EYLÜL",
            CanonicalMonth::Ekim => "EKİM",
            CanonicalMonth::Kasim => "KASIM",
            CanonicalMonth::Aralik => "ARALIK",
        }
    }
}

impl fmt::Display for CanonicalMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
