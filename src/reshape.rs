//! Aggregation of duplicate time periods and wide-to-long reshaping.

use crate::calendar::{format_date_tr, parse_day_first};
use crate::classify::{Classification, NotChartable, TimeAxis};
use crate::models::{CanonicalMonth, CellValue, Column, ResultTable};
use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeKey {
    Month(CanonicalMonth),
    Date(NaiveDate),
}

impl TimeKey {
    /// Axis label: the canonical month name or `DD.MM.YYYY`.
    pub fn label(&self) -> String {
        match self {
            TimeKey::Month(m) => m.name().to_string(),
            TimeKey::Date(d) => format_date_tr(*d),
        }
    }

    /// Calendar position (1–12) for months, days since 0001-01-01 for dates.
    pub fn sort_key(&self) -> i64 {
        match self {
            TimeKey::Month(m) => m.position() as i64,
            TimeKey::Date(d) => d.num_days_from_ce() as i64,
        }
    }
}

/// Read one cell as a time-axis value.
pub fn time_key(axis: &TimeAxis, cell: &CellValue) -> Option<TimeKey> {
    let text = match cell {
        CellValue::Null => return None,
        CellValue::Text(s) => s.clone(),
        other => other.to_text(),
    };
    match axis {
        TimeAxis::Month { .. } => CanonicalMonth::from_text(&text).map(TimeKey::Month),
        TimeAxis::Date { .. } => parse_day_first(&text).map(TimeKey::Date),
    }
}

/// Time key of every row of `column`; `None` where the cell is not a valid month/date.
pub fn time_keys(axis: &TimeAxis, column: &Column) -> Vec<Option<TimeKey>> {
    column.values.iter().map(|v| time_key(axis, v)).collect()
}

/// One observation in long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongFormRow {
    pub time: TimeKey,
    pub group: Option<String>,
    pub metric: String,
    pub value: f64,
}

impl LongFormRow {
    /// Series identity: the metric, suffixed with the group value when grouped.
    pub fn series(&self) -> String {
        match &self.group {
            Some(g) => format!("{} - {}", self.metric, g),
            None => self.metric.clone(),
        }
    }
}

/// Sum every metric per (time, group) and melt the result into long form.
///
/// Rows whose time value is not a valid month/date are dropped, as are rows
/// without a grouping value when a grouping column is in use. Output is sorted by
/// series identity, then by calendar/chronological position.
pub fn aggregate(
    table: &ResultTable,
    classification: &Classification,
) -> Result<Vec<LongFormRow>, NotChartable> {
    let axis = &classification.time_axis;
    let time_column = table
        .column(axis.column())
        .ok_or(NotChartable::MissingTimeAxis)?;
    let keys = time_keys(axis, time_column);

    let group_column = classification
        .grouping
        .as_deref()
        .and_then(|name| table.column(name));

    let metric_columns: Vec<&Column> = classification
        .metrics
        .iter()
        .filter_map(|m| table.column(&m.name))
        .collect();
    if metric_columns.is_empty() {
        return Err(NotChartable::NoMetrics);
    }

    let mut sums: BTreeMap<(TimeKey, Option<String>), Vec<f64>> = BTreeMap::new();
    let mut dropped = 0usize;
    for (row, key) in keys.iter().enumerate() {
        let Some(key) = key else {
            dropped += 1;
            continue;
        };
        let group = match group_column {
            Some(c) => match c.values.get(row) {
                Some(v) if !v.is_null() => Some(v.to_text()),
                _ => {
                    dropped += 1;
                    continue;
                }
            },
            None => None,
        };
        let acc = sums
            .entry((*key, group))
            .or_insert_with(|| vec![0.0; metric_columns.len()]);
        for (slot, column) in acc.iter_mut().zip(&metric_columns) {
            if let Some(v) = column.values.get(row).and_then(CellValue::as_f64) {
                *slot += v;
            }
        }
    }
    if dropped > 0 {
        warn!("{} row(s) without a valid time/group value left out of the chart", dropped);
    }
    if sums.is_empty() {
        return Err(NotChartable::NoValidTimeRows);
    }

    let mut rows: Vec<LongFormRow> = Vec::with_capacity(sums.len() * metric_columns.len());
    for (mi, column) in metric_columns.iter().enumerate() {
        for ((time, group), values) in &sums {
            rows.push(LongFormRow {
                time: *time,
                group: group.clone(),
                metric: column.name.clone(),
                value: values[mi],
            });
        }
    }
    rows.sort_by(|a, b| {
        a.series()
            .cmp(&b.series())
            .then(a.time.sort_key().cmp(&b.time.sort_key()))
    });
    Ok(rows)
}
