//! Table preparation for the chat UI: normalized, ordered by time, with numbers
//! rendered in the Turkish locale.

use crate::calendar::format_date_tr;
use crate::classify::{TimeAxis, detect_time_axis, is_monetary, is_year_like};
use crate::models::{CellValue, Column, ResultTable};
use crate::numeric::normalize_table;
use crate::reshape::{TimeKey, time_keys};
use crate::viz::format::NumberFormat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A table ready to show: `rows` are display strings, `source` keeps the numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub source: ResultTable,
}

impl DisplayTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_text().cmp(&b.to_text()),
    }
}

fn year_column(table: &ResultTable) -> Option<&Column> {
    table.column_ci("YIL").or_else(|| table.column_ci("YEAR"))
}

/// Order (and for month tables, filter) the rows of a normalized table.
///
/// Month tables drop rows with unknown month names and sort by year then
/// calendar month; the month cells are rewritten to their canonical names. Date
/// tables sort chronologically with unparseable dates last.
fn arrange(table: &ResultTable) -> (ResultTable, Option<(String, Vec<Option<TimeKey>>)>) {
    let Some(axis) = detect_time_axis(table) else {
        return (table.clone(), None);
    };
    let Some(time_column) = table.column(axis.column()) else {
        return (table.clone(), None);
    };
    let keys = time_keys(&axis, time_column);

    let mut order: Vec<usize> = match axis {
        TimeAxis::Month { .. } => (0..keys.len()).filter(|&i| keys[i].is_some()).collect(),
        TimeAxis::Date { .. } => (0..keys.len()).collect(),
    };
    let year = match axis {
        TimeAxis::Month { .. } => year_column(table),
        TimeAxis::Date { .. } => None,
    };
    order.sort_by(|&a, &b| {
        let by_year = match year {
            Some(c) => compare_cells(&c.values[a], &c.values[b]),
            None => Ordering::Equal,
        };
        let by_time = match (&keys[a], &keys[b]) {
            (Some(x), Some(y)) => x.sort_key().cmp(&y.sort_key()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_year.then(by_time)
    });

    let arranged = table.select_rows(&order);
    let arranged_keys: Vec<Option<TimeKey>> = order.iter().map(|&i| keys[i]).collect();
    (arranged, Some((axis.column().to_string(), arranged_keys)))
}

fn render_column(column: &Column, time: Option<&[Option<TimeKey>]>) -> Vec<String> {
    if let Some(keys) = time {
        return column
            .values
            .iter()
            .zip(keys)
            .map(|(v, k)| match k {
                Some(TimeKey::Month(m)) => m.name().to_string(),
                Some(TimeKey::Date(d)) => format_date_tr(*d),
                None => v.to_text(),
            })
            .collect();
    }
    if !column.is_numeric() || is_year_like(column) {
        return column.values.iter().map(CellValue::to_text).collect();
    }
    let numbers: Vec<f64> = column.values.iter().filter_map(CellValue::as_f64).collect();
    let format = NumberFormat::for_values(&numbers, is_monetary(&column.name));
    column
        .values
        .iter()
        .map(|v| v.as_f64().map(|x| format.format(x)).unwrap_or_default())
        .collect()
}

/// Prepare a raw query result for display.
pub fn display_table(raw: &ResultTable) -> DisplayTable {
    let normalized = normalize_table(raw);
    let (source, time) = arrange(&normalized);

    let rendered: Vec<Vec<String>> = source
        .columns()
        .iter()
        .map(|c| {
            let keys = time
                .as_ref()
                .filter(|(name, _)| *name == c.name)
                .map(|(_, k)| k.as_slice());
            render_column(c, keys)
        })
        .collect();

    let rows = (0..source.row_count())
        .map(|r| rendered.iter().map(|col| col[r].clone()).collect())
        .collect();

    DisplayTable {
        headers: source.column_names().map(str::to_string).collect(),
        rows,
        source,
    }
}
