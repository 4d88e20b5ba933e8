use talkdata::{
    ChartOutcome, ChatMessage, Column, Error, NotChartable, QueryError, ResultTable, Role,
    Session,
};

fn monthly_result() -> ResultTable {
    ResultTable::new(vec![
        Column::text("AYISMI", &["ŞUBAT", "OCAK"]),
        Column::text("NETTUTAR", &["1.500,00", "1.000,00"]),
    ])
    .unwrap()
}

fn reply_with_sql(_: &[ChatMessage]) -> talkdata::Result<String> {
    Ok("İşte sorgu:\n```sql\nSELECT AYISMI, NETTUTAR FROM T LIMIT 10\n```".to_string())
}

#[test]
fn successful_turn_has_table_and_chart() {
    let mut session = Session::new("system");
    let exec = |sql: &str| -> Result<ResultTable, QueryError> {
        assert!(sql.starts_with("SELECT AYISMI"));
        Ok(monthly_result())
    };
    let turn = session.ask("aylık harcama", &reply_with_sql, &exec).unwrap();

    assert_eq!(turn.sql.as_deref(), Some("SELECT AYISMI, NETTUTAR FROM T LIMIT 10"));
    assert!(turn.error.is_none());
    let table = turn.table.as_ref().unwrap();
    assert_eq!(table.rows[0][0], "OCAK");
    assert_eq!(table.rows[0][1], "1.000 ₺");
    match turn.chart.as_ref().unwrap() {
        ChartOutcome::Chart(c) => assert_eq!(c.series.len(), 1),
        other => panic!("expected a chart, got {:?}", other),
    }

    let roles: Vec<Role> = session.log.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
}

#[test]
fn model_sees_history_but_never_results() {
    let mut session = Session::new("system");
    let exec = |_: &str| -> Result<ResultTable, QueryError> { Ok(monthly_result()) };
    session.ask("ilk", &reply_with_sql, &exec).unwrap();

    let check = |messages: &[ChatMessage]| -> talkdata::Result<String> {
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3].content, "ikinci");
        assert!(messages.iter().all(|m| !m.content.contains("1.500")));
        Ok("Tamam.".to_string())
    };
    let turn = session.ask("ikinci", &check, &exec).unwrap();
    assert!(turn.sql.is_none());
    assert!(turn.table.is_none());
    assert!(turn.chart.is_none());
    assert_eq!(session.log.len(), 5);
}

#[test]
fn model_failure_leaves_log_unchanged() {
    let mut session = Session::new("system");
    let failing = |_: &[ChatMessage]| -> talkdata::Result<String> {
        Err(Error::Llm("rate limited".into()))
    };
    let exec = |_: &str| -> Result<ResultTable, QueryError> { unreachable!() };
    assert!(session.ask("soru", &failing, &exec).is_err());
    assert_eq!(session.log.len(), 1);
    assert!(session.turns.is_empty());
}

#[test]
fn query_failure_is_reported_and_history_kept() {
    let mut session = Session::new("system");
    let exec = |_: &str| -> Result<ResultTable, QueryError> {
        Err(QueryError::new("SQL compilation error: invalid identifier 'AYISMII'"))
    };
    let turn = session.ask("soru", &reply_with_sql, &exec).unwrap();
    assert!(turn.error.as_deref().unwrap().contains("invalid identifier"));
    assert!(turn.table.is_none());
    assert!(turn.chart.is_none());
    assert_eq!(session.log.len(), 3);
}

#[test]
fn unchartable_result_still_shows_the_table() {
    let mut session = Session::new("system");
    let exec = |_: &str| -> Result<ResultTable, QueryError> {
        Ok(ResultTable::new(vec![
            Column::text("MARKA", &["GETİR", "TRENDYOL.COM"]),
            Column::text("NETTUTAR", &["10", "20"]),
        ])
        .unwrap())
    };
    let turn = session.ask("markalar", &reply_with_sql, &exec).unwrap();
    assert_eq!(turn.table.as_ref().unwrap().row_count(), 2);
    assert_eq!(
        turn.chart,
        Some(ChartOutcome::NotChartable(NotChartable::MissingTimeAxis))
    );
}
