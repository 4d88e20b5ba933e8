//! Locale-ambiguous number parsing.
//!
//! Query results arrive with numbers written either the Turkish way (`1.234,56`)
//! or the canonical way (`1234.56`). The rule is purely character based:
//!
//! | input has        | treatment                                   | example               |
//! |------------------|---------------------------------------------|-----------------------|
//! | comma and period | period = thousands, comma = decimal         | `1.234,56` → 1234.56  |
//! | comma only       | comma = decimal                             | `123,45` → 123.45     |
//! | period / neither | already canonical                           | `1234.5` → 1234.5     |
//!
//! A comma-only value such as `12,345` is therefore read as `12.345`, never as
//! twelve thousand. Downstream prompt rules (`REPLACE(GRP, ',', '.')`) rely on that
//! reading, so it must not be made "smarter".

use crate::models::{CellValue, Column, ResultTable};
use log::debug;

/// Rewrite a locale-formatted numeral into canonical decimal text.
pub fn canonical_number_text(raw: &str) -> String {
    let s = raw.trim();
    if s.contains(',') {
        // With both present the period can only be grouping; with a comma alone
        // there is normally no period to strip.
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    }
}

/// Parse one textual cell. `None` means the cell degrades to null.
///
/// Integer literals come back as `Int` so that, for example, a text column of
/// years keeps its 4-digit text form.
pub fn normalize_number_text(raw: &str) -> Option<CellValue> {
    let s = canonical_number_text(raw);
    if s.is_empty() {
        return None;
    }
    let digits = s.strip_prefix(['-', '+']).unwrap_or(&s);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = s.parse::<i64>() {
            return Some(CellValue::Int(i));
        }
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(CellValue::Float(f)),
        _ => None,
    }
}

/// Convert a column to numbers where it looks numeric.
///
/// Numeric cells pass through. A column containing text converts only when every
/// non-blank text cell parses; blank cells become `Null`. If any cell fails the
/// column is returned unchanged, so brand codes such as `1907` next to `GETİR`
/// stay text.
pub fn normalize_column(column: &Column) -> Column {
    if !column.values.iter().any(|v| matches!(v, CellValue::Text(_))) {
        return column.clone();
    }

    let mut values = Vec::with_capacity(column.values.len());
    let mut parsed_any = false;
    for v in &column.values {
        match v {
            CellValue::Text(s) if s.trim().is_empty() => values.push(CellValue::Null),
            CellValue::Text(s) => match normalize_number_text(s) {
                Some(n) => {
                    parsed_any = true;
                    values.push(n);
                }
                None => {
                    debug!("column {}: {:?} is not a number, kept as text", column.name, s);
                    return column.clone();
                }
            },
            other => values.push(other.clone()),
        }
    }

    if !parsed_any {
        return column.clone();
    }
    Column {
        name: column.name.clone(),
        values,
    }
}

/// Run [`normalize_column`] over every column of a table.
pub fn normalize_table(table: &ResultTable) -> ResultTable {
    let mut out = table.clone();
    for column in table.columns() {
        out.replace_column(normalize_column(column));
    }
    out
}
