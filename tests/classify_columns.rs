use talkdata::classify::{NotChartable, TimeAxis, classify, is_monetary, is_year_like};
use talkdata::numeric::normalize_table;
use talkdata::{CellValue, Column, ResultTable};

fn normalized(columns: Vec<Column>) -> ResultTable {
    normalize_table(&ResultTable::new(columns).unwrap())
}

#[test]
fn year_column_groups_and_is_never_a_metric() {
    let t = normalized(vec![
        Column::text("AYISMI", &["OCAK", "ŞUBAT", "OCAK"]),
        Column::text("DONEM", &["2023", "2023", "2024"]),
        Column::text("GRP", &["1,5", "2,5", "3"]),
    ]);
    let c = classify(&t).unwrap();
    assert_eq!(
        c.time_axis,
        TimeAxis::Month {
            column: "AYISMI".into()
        }
    );
    assert_eq!(c.grouping.as_deref(), Some("DONEM"));
    let metrics: Vec<&str> = c.metrics.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(metrics, vec!["GRP"]);
}

#[test]
fn named_year_column_wins_over_inferred_one() {
    let t = normalized(vec![
        Column::text("AYISMI", &["OCAK", "MART"]),
        Column::text("KOD", &["1001", "1002"]),
        Column::text("yil", &["2023", "2024"]),
        Column::text("HARCAMA", &["10", "20"]),
    ]);
    let c = classify(&t).unwrap();
    assert_eq!(c.grouping.as_deref(), Some("yil"));
    // The other 4-digit column is still excluded from the metrics.
    let metrics: Vec<&str> = c.metrics.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(metrics, vec!["HARCAMA"]);
}

#[test]
fn year_like_share_threshold() {
    let years = Column::new(
        "X",
        vec![2023i64.into(), 15i64.into(), 7i64.into(), CellValue::Null],
    );
    // 1 of 3 non-null values is 4 digits: 33% passes.
    assert!(is_year_like(&years));
    let mostly_small = Column::new(
        "X",
        vec![2023i64.into(), 1i64.into(), 2i64.into(), 3i64.into()],
    );
    assert!(!is_year_like(&mostly_small));
    // Integral floats read as "2023.0".
    let floats = Column::new("X", vec![CellValue::Float(2023.0)]);
    assert!(!is_year_like(&floats));
    assert!(is_year_like(&Column::new("YEAR", vec![CellValue::Null])));
}

#[test]
fn money_keywords_match_substrings_case_insensitively() {
    assert!(is_monetary("TOPLAM_HARCAMA"));
    assert!(is_monetary("net_tutar"));
    assert!(is_monetary("Bütçe"));
    assert!(is_monetary("revenue_usd"));
    assert!(!is_monetary("GRP"));
    assert!(!is_monetary("REKLAM_SAYISI"));

    let t = normalized(vec![
        Column::text("TARIH", &["01.01.2024", "02.01.2024"]),
        Column::text("NETTUTAR", &["1.000,00", "2.000,50"]),
        Column::text("ADET", &["3", "4"]),
    ]);
    let c = classify(&t).unwrap();
    assert!(c.metrics.iter().find(|m| m.name == "NETTUTAR").unwrap().monetary);
    assert!(!c.metrics.iter().find(|m| m.name == "ADET").unwrap().monetary);
    assert!(c.any_monetary());
}

#[test]
fn month_axis_preferred_over_date_axis() {
    let t = normalized(vec![
        Column::text("TARIH", &["01.01.2024", "01.02.2024"]),
        Column::text("AYISMI", &["OCAK", "ŞUBAT"]),
        Column::text("GRP", &["1", "2"]),
    ]);
    assert!(matches!(classify(&t).unwrap().time_axis, TimeAxis::Month { .. }));
}

#[test]
fn unnamed_time_columns_are_inferred() {
    let t = normalized(vec![
        Column::text("PERIOD", &["Ocak", "Mart"]),
        Column::text("GRP", &["1", "2"]),
    ]);
    assert_eq!(
        classify(&t).unwrap().time_axis,
        TimeAxis::Month {
            column: "PERIOD".into()
        }
    );

    let t = normalized(vec![
        Column::text("GUN", &["23.08.2023", "24.08.2023"]),
        Column::text("GRP", &["1", "2"]),
    ]);
    let c = classify(&t).unwrap();
    assert_eq!(c.time_axis, TimeAxis::Date { column: "GUN".into() });
    assert_eq!(c.grouping, None);
}

#[test]
fn not_chartable_reasons() {
    assert_eq!(
        classify(&ResultTable::default()),
        Err(NotChartable::EmptyTable)
    );
    let no_time = normalized(vec![
        Column::text("MARKA", &["GETİR"]),
        Column::text("HARCAMA", &["10"]),
    ]);
    assert_eq!(classify(&no_time), Err(NotChartable::MissingTimeAxis));

    let no_metric = normalized(vec![
        Column::text("AYISMI", &["OCAK"]),
        Column::text("MARKA", &["GETİR"]),
    ]);
    assert_eq!(classify(&no_metric), Err(NotChartable::NoMetrics));
    assert!(!NotChartable::NoMetrics.to_string().is_empty());
}
