//! One conversation: question → model → SQL → result table → chart.
//!
//! The [`ConversationLog`] only grows. A turn whose model call fails leaves it
//! untouched; any other turn appends the user question and the assistant reply,
//! even when the query itself then fails. Query results never go back to the
//! model, only role and text do.

use crate::classify::NotChartable;
use crate::display::{DisplayTable, display_table};
use crate::error::Result;
use crate::llm::{ChatMessage, LanguageModel};
use crate::query::QueryExecutor;
use crate::sql::extract_sql;
use crate::viz::{LineChart, chart_from_table};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Ordered chat history, system prompt first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// What the chart slot of a turn shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartOutcome {
    Chart(LineChart),
    /// Informational note; the table is still shown.
    NotChartable(NotChartable),
}

/// Everything one question produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    /// Full assistant text, shown as is.
    pub response: String,
    pub sql: Option<String>,
    pub table: Option<DisplayTable>,
    pub chart: Option<ChartOutcome>,
    /// Query failure message for this turn.
    pub error: Option<String>,
}

/// Run one turn against `log`.
pub fn run_turn(
    log: &mut ConversationLog,
    question: &str,
    llm: &dyn LanguageModel,
    executor: &dyn QueryExecutor,
) -> Result<Turn> {
    let mut request: Vec<ChatMessage> = log.messages().to_vec();
    request.push(ChatMessage::user(question));
    let response = llm.complete(&request)?;

    log.push(ChatMessage::user(question));
    log.push(ChatMessage::assistant(response.clone()));

    let mut turn = Turn {
        question: question.to_string(),
        response,
        sql: None,
        table: None,
        chart: None,
        error: None,
    };

    let Some(sql) = extract_sql(&turn.response) else {
        info!("response carries no SQL block");
        return Ok(turn);
    };
    info!("executing query ({} chars)", sql.len());
    turn.sql = Some(sql.clone());

    match executor.execute(&sql) {
        Ok(result) => {
            info!(
                "query returned {} row(s), {} column(s)",
                result.row_count(),
                result.columns().len()
            );
            turn.chart = Some(match chart_from_table(&result) {
                Ok(chart) => ChartOutcome::Chart(chart),
                Err(reason) => ChartOutcome::NotChartable(reason),
            });
            turn.table = Some(display_table(&result));
        }
        Err(e) => {
            warn!("{}", e);
            turn.error = Some(e.message);
        }
    }
    Ok(turn)
}

/// A conversation and the turns it produced so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub log: ConversationLog,
    pub turns: Vec<Turn>,
}

impl Session {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            log: ConversationLog::new(system_prompt),
            turns: Vec::new(),
        }
    }

    /// Ask one question; on a model failure nothing is recorded.
    pub fn ask(
        &mut self,
        question: &str,
        llm: &dyn LanguageModel,
        executor: &dyn QueryExecutor,
    ) -> Result<&Turn> {
        let turn = run_turn(&mut self.log, question, llm, executor)?;
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }
}
