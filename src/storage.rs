use crate::display::DisplayTable;
use crate::error::Result as TableResult;
use crate::models::{CellValue, Column, ResultTable};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Parse CSV with a header row into a text table; empty fields become null.
///
/// No typing happens here: numbers stay text until
/// [`crate::numeric::normalize_table`] runs, as they would from a query engine.
pub fn read_csv<R: Read>(reader: R) -> TableResult<ResultTable> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (col, field) in values.iter_mut().zip(record.iter()) {
            col.push(if field.is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(field.to_string())
            });
        }
    }
    ResultTable::new(
        headers
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

/// Load a CSV file as a result table.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<ResultTable> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    read_csv(f).with_context(|| format!("parse {}", path.display()))
}

/// Spreadsheet apps evaluate cells starting with these. Signed numbers are kept.
fn neutralize_formula(cell: &str) -> String {
    let mut chars = cell.chars();
    match (chars.next(), chars.next()) {
        (Some('+' | '-'), Some(d)) if d.is_ascii_digit() => cell.to_string(),
        (Some('=' | '+' | '-' | '@'), _) => format!("'{}", cell),
        _ => cell.to_string(),
    }
}

/// Save a display table as CSV with header, values as shown.
pub fn save_csv<P: AsRef<Path>>(table: &DisplayTable, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(|c| neutralize_formula(c)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable value (chart spec, table, summary) as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
