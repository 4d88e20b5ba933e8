//! Chart building: long-form rows → line-chart description, plus two outputs for it.
//!
//! - One line per (metric, group) series, colored from the Microsoft Office palette
//! - Month axes keep calendar order (`OCAK` … `ARALIK`), never alphabetical
//! - Turkish number display (`1.234,56`), ` ₺` suffix for monetary series
//! - [`vega::to_vega_lite`] exports a Vega-Lite spec, [`draw::plot_chart`] renders SVG/PNG

pub mod draw;
pub mod format;
pub mod legend;
pub mod types;
pub mod util;
pub mod vega;

pub use format::NumberFormat;
pub use types::{
    AxisKind, ChartPoint, DEFAULT_LEGEND_MODE, LegendMode, LineChart, SeriesSpec, TooltipField,
    XAxis, YAxis,
};

use crate::classify::{Classification, NotChartable, TimeAxis, classify};
use crate::models::{CanonicalMonth, ResultTable};
use crate::numeric::normalize_table;
use crate::reshape::{LongFormRow, aggregate};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use util::{office_color, to_hex};

pub const X_TITLE_MONTH: &str = "Ay";
pub const X_TITLE_DATE: &str = "Tarih";
pub const Y_TITLE_MONEY: &str = "Tutar (₺)";
pub const Y_TITLE_VALUE: &str = "Değer";
pub const COLOR_TITLE_SERIES: &str = "Seri";
pub const COLOR_TITLE_METRIC: &str = "Metrik";
pub const CHART_HEIGHT: u32 = 360;

/// Caption derived from metric names: one name as is, up to three joined, then "first + N more".
fn derive_title(metrics: &[&str]) -> String {
    let names: BTreeSet<&str> = metrics.iter().copied().collect();
    match names.len() {
        0 => "Sonuç".to_string(),
        1..=3 => names.into_iter().collect::<Vec<_>>().join(", "),
        n => {
            let first = names.iter().next().copied().unwrap_or_default();
            format!("{first} + {} more", n - 1)
        }
    }
}

/// Build the line chart for already aggregated rows.
pub fn build_line_chart(rows: &[LongFormRow], classification: &Classification) -> LineChart {
    let monetary_by_metric: BTreeMap<&str, bool> = classification
        .metrics
        .iter()
        .map(|m| (m.name.as_str(), m.monetary))
        .collect();
    let any_monetary = classification.any_monetary();

    let (x, color_title) = match &classification.time_axis {
        TimeAxis::Month { column } => (
            XAxis {
                field: column.clone(),
                title: X_TITLE_MONTH.to_string(),
                kind: AxisKind::Ordinal,
                domain: CanonicalMonth::ALL
                    .iter()
                    .map(|m| m.name().to_string())
                    .collect(),
            },
            COLOR_TITLE_SERIES,
        ),
        TimeAxis::Date { column } => (
            XAxis {
                field: column.clone(),
                title: X_TITLE_DATE.to_string(),
                kind: AxisKind::Temporal,
                domain: Vec::new(),
            },
            COLOR_TITLE_METRIC,
        ),
    };

    let y_title = if any_monetary {
        Y_TITLE_MONEY
    } else {
        Y_TITLE_VALUE
    };
    let all_values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let y_format = NumberFormat::for_values(&all_values, any_monetary);

    // BTreeMap keeps series in identity order, matching the row sort.
    let mut grouped: BTreeMap<String, Vec<&LongFormRow>> = BTreeMap::new();
    for r in rows {
        grouped.entry(r.series()).or_default().push(r);
    }

    let series: Vec<SeriesSpec> = grouped
        .into_iter()
        .enumerate()
        .map(|(idx, (id, mut members))| {
            members.sort_by_key(|r| r.time.sort_key());
            let metric = members[0].metric.clone();
            let group = members[0].group.clone();
            let monetary = monetary_by_metric
                .get(metric.as_str())
                .copied()
                .unwrap_or(false);
            let format =
                NumberFormat::for_values(members.iter().map(|r| &r.value), monetary);
            let points = members
                .iter()
                .map(|r| {
                    let label = r.time.label();
                    ChartPoint {
                        time: r.time,
                        order: r.time.sort_key(),
                        value: r.value,
                        tooltip: vec![
                            TooltipField {
                                title: x.title.clone(),
                                value: label.clone(),
                            },
                            TooltipField {
                                title: color_title.to_string(),
                                value: id.clone(),
                            },
                            TooltipField {
                                title: y_title.to_string(),
                                value: format.format(r.value),
                            },
                        ],
                        label,
                    }
                })
                .collect();
            SeriesSpec {
                color: to_hex(office_color(idx)),
                id,
                metric,
                group,
                monetary,
                format,
                points,
            }
        })
        .collect();

    let metric_names: Vec<&str> = classification
        .metrics
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    LineChart {
        title: derive_title(&metric_names),
        x,
        y: YAxis {
            title: y_title.to_string(),
            format: y_format,
        },
        color_title: color_title.to_string(),
        height: CHART_HEIGHT,
        series,
    }
}

/// Whole pipeline for one result table: normalize, classify, aggregate, build.
pub fn chart_from_table(table: &ResultTable) -> Result<LineChart, NotChartable> {
    let normalized = normalize_table(table);
    let outcome = classify(&normalized)
        .and_then(|c| aggregate(&normalized, &c).map(|rows| build_line_chart(&rows, &c)));
    match &outcome {
        Ok(chart) => debug!(
            "chart '{}' with {} series",
            chart.title,
            chart.series.len()
        ),
        Err(reason) => warn!("no chart: {}", reason),
    }
    outcome
}
