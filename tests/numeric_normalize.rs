use talkdata::numeric::{canonical_number_text, normalize_column, normalize_number_text};
use talkdata::viz;
use talkdata::{CellValue, Column, ResultTable};

fn as_f64(s: &str) -> Option<f64> {
    normalize_number_text(s).and_then(|v| v.as_f64())
}

#[test]
fn comma_and_period_mean_turkish_grouping() {
    assert_eq!(as_f64("1.234,56"), Some(1234.56));
    assert_eq!(as_f64("1.234.567,8"), Some(1234567.8));
    // Same result as stripping periods then swapping commas, whatever the order.
    for s in ["1.234,56", "12,345.67", "9.999.999,01"] {
        let expected: f64 = s.replace('.', "").replace(',', ".").parse().unwrap();
        assert_eq!(as_f64(s), Some(expected), "{s}");
    }
}

#[test]
fn comma_only_is_a_decimal_separator() {
    assert_eq!(as_f64("123,45"), Some(123.45));
    // Ambiguous: could be twelve thousand, read as twelve point three.
    assert_eq!(as_f64("12,345"), Some(12.345));
    assert_eq!(canonical_number_text(" 12,345 "), "12.345");
}

#[test]
fn period_only_or_plain_is_canonical() {
    assert_eq!(as_f64("1234.5"), Some(1234.5));
    assert_eq!(normalize_number_text("2023"), Some(CellValue::Int(2023)));
    assert_eq!(normalize_number_text("-17"), Some(CellValue::Int(-17)));
    assert_eq!(normalize_number_text("abc"), None);
    assert_eq!(normalize_number_text("   "), None);
}

#[test]
fn blank_cells_become_null_in_a_numeric_column() {
    let col = Column::text("HARCAMA", &["1.500,25", "", "  ", "300"]);
    let out = normalize_column(&col);
    assert_eq!(out.values[0], CellValue::Float(1500.25));
    assert!(out.values[1].is_null());
    assert!(out.values[2].is_null());
    assert_eq!(out.values[3], CellValue::Int(300));
    assert!(out.is_numeric());
}

#[test]
fn one_unparseable_cell_keeps_the_column_as_text() {
    let col = Column::text("HARCAMA", &["1.500,25", "n/a", "300"]);
    assert_eq!(normalize_column(&col), col);
}

#[test]
fn brand_codes_that_look_numeric_stay_text() {
    let marka = Column::text("MARKA", &["GETİR", "1907", "MIGROS"]);
    assert_eq!(normalize_column(&marka), marka);

    let t = ResultTable::new(vec![
        Column::text("AYISMI", &["OCAK", "ŞUBAT", "MART"]),
        marka,
        Column::text("GRP", &["1,5", "2", "3"]),
    ])
    .unwrap();
    let chart = viz::chart_from_table(&t).unwrap();
    let mut ids: Vec<&str> = chart.series.iter().map(|s| s.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["GRP - 1907", "GRP - GETİR", "GRP - MIGROS"]);
}

#[test]
fn text_columns_are_left_alone() {
    let col = Column::text("MARKA", &["GETİR", "TRENDYOL.COM"]);
    assert_eq!(normalize_column(&col), col);

    let months = Column::text("AYISMI", &["OCAK", "ŞUBAT"]);
    assert_eq!(normalize_column(&months), months);

    let dates = Column::text("TARIH", &["23.08.2023", "01.09.2023"]);
    assert_eq!(normalize_column(&dates), dates);
}

#[test]
fn numeric_columns_pass_through() {
    let col = Column::new("GRP", vec![CellValue::Float(1.5), CellValue::Null, 2i64.into()]);
    assert_eq!(normalize_column(&col), col);
}
