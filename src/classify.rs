//! Column classification: which column is the time axis, which one groups the
//! series, and which ones are the metrics to draw.
//!
//! Input is expected to have gone through [`crate::numeric::normalize_table`], so
//! numeric columns already hold `Int`/`Float` cells.

use crate::calendar::parse_day_first;
use crate::models::{CanonicalMonth, Column, ResultTable};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column names that hold month names.
pub const MONTH_COLUMN_NAMES: [&str; 2] = ["AYISMI", "AY_ISMI"];
/// Column names that hold day-first dates.
pub const DATE_COLUMN_NAMES: [&str; 3] = ["TARIH", "TARİH", "DATE"];
/// Column names that hold years.
pub const YEAR_COLUMN_NAMES: [&str; 2] = ["YIL", "YEAR"];

/// Name fragments marking a metric as a currency amount.
pub const MONEY_KEYWORDS: [&str; 13] = [
    "HARCAMA", "CİRO", "CIRO", "HASILAT", "REVENUE", "SATIŞ", "SATIS", "TUTAR", "BÜTÇE", "BUTCE",
    "BUDGET", "SPEND", "AMOUNT",
];

/// Minimum share of 4-digit values for a column to count as years.
pub const YEAR_LIKE_MIN_SHARE: f64 = 0.3;

/// Why a result cannot be charted. The message is meant for the user; the table
/// is still shown.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotChartable {
    #[error("Sonuç tablosu boş.")]
    EmptyTable,
    #[error("Grafik için ay (AYISMI) veya tarih (TARIH) kolonu yok.")]
    MissingTimeAxis,
    #[error("Geçerli ay/tarih satırı kalmadı.")]
    NoValidTimeRows,
    #[error("Çizilecek sayısal metrik bulunamadı.")]
    NoMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAxis {
    /// Month names, ordered by calendar position.
    Month { column: String },
    /// Day-first dates, ordered chronologically.
    Date { column: String },
}

impl TimeAxis {
    pub fn column(&self) -> &str {
        match self {
            TimeAxis::Month { column } | TimeAxis::Date { column } => column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricColumn {
    pub name: String,
    pub monetary: bool,
}

impl MetricColumn {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let monetary = is_monetary(&name);
        Self { name, monetary }
    }
}

/// Typed outcome of classifying one result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub time_axis: TimeAxis,
    pub grouping: Option<String>,
    pub metrics: Vec<MetricColumn>,
}

impl Classification {
    pub fn any_monetary(&self) -> bool {
        self.metrics.iter().any(|m| m.monetary)
    }
}

/// Case-insensitive substring match against [`MONEY_KEYWORDS`].
pub fn is_monetary(name: &str) -> bool {
    let upper = name.to_uppercase();
    MONEY_KEYWORDS.iter().any(|k| upper.contains(k))
}

fn name_in(name: &str, names: &[&str]) -> bool {
    let upper = name.to_uppercase();
    names.iter().any(|n| *n == upper)
}

fn is_four_digits(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// A column holds years when it is named so, or when at least 30% of its non-null
/// values are exactly four digits.
pub fn is_year_like(column: &Column) -> bool {
    if name_in(&column.name, &YEAR_COLUMN_NAMES) {
        return true;
    }
    let mut total = 0usize;
    let mut hits = 0usize;
    for v in column.non_null() {
        total += 1;
        if is_four_digits(v.to_text().trim()) {
            hits += 1;
        }
    }
    hits > 0 && hits as f64 >= total as f64 * YEAR_LIKE_MIN_SHARE
}

fn all_text_matching(column: &Column, pred: impl Fn(&str) -> bool) -> bool {
    let mut any = false;
    for v in column.non_null() {
        match v.as_text() {
            Some(s) if pred(s) => any = true,
            _ => return false,
        }
    }
    any
}

/// Pick the time axis: a month-name column if any, otherwise a date column.
pub fn detect_time_axis(table: &ResultTable) -> Option<TimeAxis> {
    let cols = table.columns();
    let named_month = cols.iter().find(|c| name_in(&c.name, &MONTH_COLUMN_NAMES));
    let month = named_month.or_else(|| {
        cols.iter()
            .find(|c| all_text_matching(c, |s| CanonicalMonth::from_text(s).is_some()))
    });
    if let Some(c) = month {
        return Some(TimeAxis::Month {
            column: c.name.clone(),
        });
    }

    let named_date = cols.iter().find(|c| name_in(&c.name, &DATE_COLUMN_NAMES));
    named_date
        .or_else(|| {
            cols.iter()
                .find(|c| all_text_matching(c, |s| parse_day_first(s).is_some()))
        })
        .map(|c| TimeAxis::Date {
            column: c.name.clone(),
        })
}

fn find_grouping(table: &ResultTable, time_column: &str) -> Option<String> {
    for name in YEAR_COLUMN_NAMES {
        if let Some(c) = table.column_ci(name)
            && c.name != time_column
        {
            return Some(c.name.clone());
        }
    }
    table
        .columns()
        .iter()
        .filter(|c| c.name != time_column)
        .find(|c| is_year_like(c))
        .map(|c| c.name.clone())
}

/// Classify a normalized table, or explain why it cannot be charted.
pub fn classify(table: &ResultTable) -> Result<Classification, NotChartable> {
    if table.is_empty() {
        return Err(NotChartable::EmptyTable);
    }
    let time_axis = detect_time_axis(table).ok_or(NotChartable::MissingTimeAxis)?;
    let time_column = time_axis.column().to_string();

    let grouping = match time_axis {
        TimeAxis::Month { .. } => find_grouping(table, &time_column),
        TimeAxis::Date { .. } => None,
    };

    let metrics: Vec<MetricColumn> = table
        .columns()
        .iter()
        .filter(|c| c.name != time_column)
        .filter(|c| Some(&c.name) != grouping.as_ref())
        .filter(|c| c.is_numeric())
        .filter(|c| match time_axis {
            TimeAxis::Month { .. } => !is_year_like(c),
            // A date carries its year; only columns named as years are left out.
            TimeAxis::Date { .. } => !name_in(&c.name, &YEAR_COLUMN_NAMES),
        })
        .map(|c| MetricColumn::new(c.name.clone()))
        .collect();

    debug!(
        "classified: time={:?} grouping={:?} metrics={:?}",
        time_axis,
        grouping,
        metrics.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
    );

    if metrics.is_empty() {
        return Err(NotChartable::NoMetrics);
    }
    Ok(Classification {
        time_axis,
        grouping,
        metrics,
    })
}
