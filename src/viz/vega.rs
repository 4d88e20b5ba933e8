//! Vega-Lite export of a [`LineChart`], for front ends that embed Vega.
//!
//! The spec carries the Turkish `formatLocale`/`timeFormatLocale`, so the D3 format
//! strings in the axis and tooltip render `1.234,56 ₺` on the client as well.

use super::types::{AxisKind, LineChart};
use crate::reshape::TimeKey;
use serde_json::{Value, json};

const VALUE_FIELD: &str = "Değer";
const ORDER_FIELD: &str = "_ORDER";

/// Turkish number locale in D3 `formatLocale` shape.
pub fn number_locale() -> Value {
    json!({
        "decimal": ",",
        "thousands": ".",
        "grouping": [3],
        "currency": ["", " ₺"]
    })
}

/// Turkish time locale in D3 `timeFormatLocale` shape.
pub fn time_locale() -> Value {
    json!({
        "dateTime": "%A, %e %B %Y %X",
        "date": "%d.%m.%Y",
        "time": "%H:%M:%S",
        "periods": ["ÖÖ", "ÖS"],
        "days": ["Pazar", "Pazartesi", "Salı", "Çarşamba", "Perşembe", "Cuma", "Cumartesi"],
        "shortDays": ["Paz", "Pts", "Sal", "Çar", "Per", "Cum", "Cts"],
        "months": ["Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
                   "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık"],
        "shortMonths": ["Oca", "Şub", "Mar", "Nis", "May", "Haz",
                        "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara"]
    })
}

fn x_value(time: &TimeKey, label: &str) -> Value {
    match time {
        TimeKey::Month(_) => Value::String(label.to_string()),
        TimeKey::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
    }
}

/// Build a Vega-Lite v5 line + point spec.
pub fn to_vega_lite(chart: &LineChart) -> Value {
    let x_field = chart.x.field.as_str();
    let color_field = chart.color_title.as_str();
    let fmt = chart.y.format.d3();

    let values: Vec<Value> = chart
        .series
        .iter()
        .flat_map(|s| {
            s.points.iter().map(move |p| {
                let mut row = serde_json::Map::new();
                row.insert(x_field.to_string(), x_value(&p.time, &p.label));
                row.insert(color_field.to_string(), Value::String(s.id.clone()));
                row.insert(VALUE_FIELD.to_string(), json!(p.value));
                row.insert(ORDER_FIELD.to_string(), json!(p.order));
                Value::Object(row)
            })
        })
        .collect();

    let x_encoding = match chart.x.kind {
        AxisKind::Ordinal => json!({
            "field": x_field,
            "type": "nominal",
            "title": chart.x.title,
            "scale": { "domain": chart.x.domain },
            "sort": chart.x.domain
        }),
        AxisKind::Temporal => json!({
            "field": x_field,
            "type": "temporal",
            "title": chart.x.title,
            "axis": { "format": "%d.%m.%Y" }
        }),
    };
    let x_tooltip = match chart.x.kind {
        AxisKind::Ordinal => json!({ "field": x_field, "type": "nominal", "title": chart.x.title }),
        AxisKind::Temporal => json!({
            "field": x_field, "type": "temporal", "title": chart.x.title, "format": "%d.%m.%Y"
        }),
    };
    let domain: Vec<&str> = chart.series.iter().map(|s| s.id.as_str()).collect();
    let range: Vec<&str> = chart.series.iter().map(|s| s.color.as_str()).collect();

    json!({
        "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
        "title": chart.title,
        "height": chart.height,
        "width": "container",
        "data": { "values": values },
        "mark": { "type": "line", "point": true, "interpolate": "linear" },
        "encoding": {
            "x": x_encoding,
            "y": {
                "field": VALUE_FIELD,
                "type": "quantitative",
                "title": chart.y.title,
                "axis": { "format": fmt }
            },
            "color": {
                "field": color_field,
                "type": "nominal",
                "title": chart.color_title,
                "scale": { "domain": domain, "range": range }
            },
            "detail": { "field": color_field, "type": "nominal" },
            "order": { "field": ORDER_FIELD, "type": "quantitative" },
            "tooltip": [
                x_tooltip,
                { "field": color_field, "type": "nominal" },
                { "field": VALUE_FIELD, "type": "quantitative", "title": chart.y.title, "format": fmt }
            ]
        },
        "config": {
            "locale": { "number": number_locale(), "time": time_locale() }
        }
    })
}
