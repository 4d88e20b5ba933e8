use talkdata::viz::{
    self, AxisKind, COLOR_TITLE_METRIC, COLOR_TITLE_SERIES, LineChart, X_TITLE_DATE,
    X_TITLE_MONTH, Y_TITLE_MONEY, Y_TITLE_VALUE,
};
use talkdata::{Column, NotChartable, ResultTable};

fn chart(columns: Vec<Column>) -> Result<LineChart, NotChartable> {
    viz::chart_from_table(&ResultTable::new(columns).unwrap())
}

#[test]
fn end_to_end_month_year_money() {
    let c = chart(vec![
        Column::text("AYISMI", &["OCAK", "OCAK", "ŞUBAT"]),
        Column::text("YIL", &["2023", "2024", "2023"]),
        Column::text("TUTAR", &["100,00", "50,00", "200,00"]),
    ])
    .unwrap();

    assert_eq!(c.x.kind, AxisKind::Ordinal);
    assert_eq!(c.x.title, X_TITLE_MONTH);
    assert_eq!(c.x.domain.len(), 12);
    assert_eq!(c.x.domain[1], "ŞUBAT");
    assert_eq!(c.y.title, Y_TITLE_MONEY);
    assert_eq!(c.color_title, COLOR_TITLE_SERIES);
    assert_eq!(c.height, 360);

    let ids: Vec<&str> = c.series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["TUTAR - 2023", "TUTAR - 2024"]);

    let s2023 = &c.series[0];
    let labels: Vec<&str> = s2023.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["OCAK", "ŞUBAT"]);
    let values: Vec<f64> = s2023.points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![100.0, 200.0]);
    assert!(s2023.monetary);
    assert_eq!(c.series[1].points.len(), 1);
    assert_eq!(c.series[1].points[0].value, 50.0);
    assert_ne!(c.series[0].color, c.series[1].color);
}

#[test]
fn x_order_is_calendar_order() {
    let c = chart(vec![
        Column::text("AYISMI", &["MART", "OCAK", "ŞUBAT"]),
        Column::text("GRP", &["3", "1", "2"]),
    ])
    .unwrap();
    let labels: Vec<&str> = c.series[0].points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["OCAK", "ŞUBAT", "MART"]);
    let orders: Vec<i64> = c.series[0].points.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[test]
fn monetary_tooltip_uses_turkish_currency_format() {
    let c = chart(vec![
        Column::text("AYISMI", &["OCAK", "ŞUBAT"]),
        Column::text("HARCAMA", &["1.234,5", "1000"]),
        Column::text("ADET", &["12000", "35"]),
    ])
    .unwrap();
    assert_eq!(c.y.title, Y_TITLE_MONEY);

    let harcama = c.series.iter().find(|s| s.metric == "HARCAMA").unwrap();
    assert!(harcama.monetary);
    // One fractional value forces two decimals for the whole series.
    assert_eq!(harcama.format.decimals, 2);
    let tip = &harcama.points[0].tooltip;
    assert_eq!(tip[0].value, "OCAK");
    assert_eq!(tip[1].value, "HARCAMA");
    assert_eq!(tip[2].value, "1.234,50 ₺");
    assert_eq!(harcama.points[1].tooltip[2].value, "1.000,00 ₺");

    let adet = c.series.iter().find(|s| s.metric == "ADET").unwrap();
    assert!(!adet.monetary);
    assert_eq!(adet.points[0].tooltip[2].value, "12.000");
}

#[test]
fn plain_metrics_get_the_plain_title() {
    let c = chart(vec![
        Column::text("AYISMI", &["OCAK"]),
        Column::text("GRP", &["12,5"]),
    ])
    .unwrap();
    assert_eq!(c.y.title, Y_TITLE_VALUE);
    assert!(!c.y.format.currency);
    assert_eq!(c.series[0].points[0].tooltip[2].value, "12,50");
}

#[test]
fn date_axis_is_temporal_with_metric_legend() {
    let c = chart(vec![
        Column::text("TARIH", &["02.01.2024", "01.01.2024"]),
        Column::text("GRP", &["2", "1"]),
        Column::text("SPOT", &["5", "6"]),
    ])
    .unwrap();
    assert_eq!(c.x.kind, AxisKind::Temporal);
    assert_eq!(c.x.title, X_TITLE_DATE);
    assert_eq!(c.color_title, COLOR_TITLE_METRIC);
    assert!(c.x.domain.is_empty());
    assert_eq!(c.series.len(), 2);
    assert_eq!(c.series[0].points[0].label, "01.01.2024");
}

#[test]
fn daily_spend_with_four_digit_amounts_is_charted() {
    let c = chart(vec![
        Column::text("TARIH", &["01.01.2024", "02.01.2024", "03.01.2024"]),
        Column::text("YIL", &["2024", "2024", "2024"]),
        Column::text("HARCAMA", &["1500", "2500", "3000"]),
    ])
    .unwrap();
    assert_eq!(c.x.kind, AxisKind::Temporal);
    assert_eq!(c.y.title, Y_TITLE_MONEY);
    let ids: Vec<&str> = c.series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["HARCAMA"]);
    assert_eq!(c.series[0].points.len(), 3);
}

#[test]
fn not_chartable_is_reported() {
    let r = chart(vec![
        Column::text("MARKA", &["GETİR"]),
        Column::text("HARCAMA", &["10"]),
    ]);
    assert_eq!(r.unwrap_err(), NotChartable::MissingTimeAxis);
}

#[test]
fn vega_lite_spec_carries_order_and_locale() {
    let c = chart(vec![
        Column::text("AYISMI", &["ŞUBAT", "OCAK"]),
        Column::text("NETTUTAR", &["20000", "10000"]),
    ])
    .unwrap();
    let spec = viz::vega::to_vega_lite(&c);
    assert_eq!(spec["mark"]["type"], "line");
    assert_eq!(spec["encoding"]["x"]["sort"][0], "OCAK");
    assert_eq!(spec["encoding"]["x"]["scale"]["domain"][11], "ARALIK");
    assert_eq!(spec["encoding"]["y"]["axis"]["format"], "$,.0f");
    assert_eq!(spec["config"]["locale"]["number"]["decimal"], ",");
    assert_eq!(spec["config"]["locale"]["number"]["thousands"], ".");
    assert_eq!(spec["config"]["locale"]["number"]["currency"][1], " ₺");

    let values = spec["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0]["AYISMI"], "OCAK");
    assert_eq!(values[0]["Değer"], 10000.0);
    assert_eq!(values[0]["_ORDER"], 1);
}
