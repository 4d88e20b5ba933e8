//! Public types for the chart description.

use super::format::NumberFormat;
use crate::reshape::TimeKey;
use serde::{Deserialize, Serialize};

/// Legend placement for rendered images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Single column panel right of the plot.
    Right,
    /// Band below the plot, labels flowing left to right.
    Bottom,
}

pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Right;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Month names with an explicit calendar-order domain.
    Ordinal,
    /// Calendar dates.
    Temporal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    /// Source column name (`AYISMI`, `TARIH`, …).
    pub field: String,
    pub title: String,
    pub kind: AxisKind,
    /// Category order for ordinal axes; empty for temporal ones.
    pub domain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    pub title: String,
    pub format: NumberFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipField {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: TimeKey,
    /// Axis label of `time`.
    pub label: String,
    /// Calendar/chronological position of `time`.
    pub order: i64,
    pub value: f64,
    pub tooltip: Vec<TooltipField>,
}

/// One line of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Series identity, e.g. `TUTAR - 2023`.
    pub id: String,
    pub metric: String,
    pub group: Option<String>,
    /// `#RRGGBB`
    pub color: String,
    pub monetary: bool,
    pub format: NumberFormat,
    pub points: Vec<ChartPoint>,
}

/// Complete line-chart description handed to a front end or renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    pub x: XAxis,
    pub y: YAxis,
    /// Title of the color legend (`Seri` / `Metrik`).
    pub color_title: String,
    pub height: u32,
    pub series: Vec<SeriesSpec>,
}
