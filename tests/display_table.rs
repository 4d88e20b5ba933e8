use talkdata::{CellValue, Column, ResultTable, display_table};

#[test]
fn month_tables_sort_by_year_then_month_and_drop_unknown_months() {
    let raw = ResultTable::new(vec![
        Column::text("AYISMI", &["mart", "FOOBAR", "ocak", "şubat"]),
        Column::text("YIL", &["2023", "2023", "2024", "2023"]),
        Column::text("GRP", &["1,5", "9", "2", "3"]),
    ])
    .unwrap();
    let t = display_table(&raw);
    assert_eq!(t.headers, vec!["AYISMI", "YIL", "GRP"]);
    let months: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(months, vec!["ŞUBAT", "MART", "OCAK"]);
    let years: Vec<&str> = t.rows.iter().map(|r| r[1].as_str()).collect();
    assert_eq!(years, vec!["2023", "2023", "2024"]);
    // Year column stays unformatted, the metric gets two decimals throughout.
    assert_eq!(t.rows[1][2], "1,50");
    assert_eq!(t.rows[0][2], "3,00");
}

#[test]
fn source_keeps_numbers_for_charting() {
    let raw = ResultTable::new(vec![
        Column::text("AYISMI", &["ŞUBAT", "OCAK"]),
        Column::text("HARCAMA", &["1.234,50", "10"]),
    ])
    .unwrap();
    let t = display_table(&raw);
    assert_eq!(t.rows[0], vec!["OCAK", "10,00 ₺"]);
    assert_eq!(t.rows[1], vec!["ŞUBAT", "1.234,50 ₺"]);
    assert_eq!(
        t.source.column("HARCAMA").unwrap().values,
        vec![CellValue::Int(10), CellValue::Float(1234.5)]
    );
}

#[test]
fn date_tables_sort_chronologically_with_bad_dates_last() {
    let raw = ResultTable::new(vec![
        Column::text("TARIH", &["2024-01-03", "bilinmiyor", "02.01.2024"]),
        Column::text("SPOT", &["3", "1", "2"]),
    ])
    .unwrap();
    let t = display_table(&raw);
    let dates: Vec<&str> = t.rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(dates, vec!["02.01.2024", "03.01.2024", "bilinmiyor"]);
}

#[test]
fn tables_without_time_axis_keep_their_order() {
    let raw = ResultTable::new(vec![
        Column::text("MARKA", &["YEMEKSEPETI.COM", "GETİR"]),
        Column::text("NETTUTAR", &["100", "2.500,75"]),
    ])
    .unwrap();
    let t = display_table(&raw);
    assert_eq!(t.rows[0], vec!["YEMEKSEPETI.COM", "100,00 ₺"]);
    assert_eq!(t.rows[1], vec!["GETİR", "2.500,75 ₺"]);
}
