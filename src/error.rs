//! Error types shared by the library.
//!
//! Cell-level problems never show up here: they degrade to `CellValue::Null`.
//! "Not chartable" is not an error either, see [`crate::classify::NotChartable`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid table name '{0}', expected DATABASE.SCHEMA.TABLE")]
    TableName(String),

    #[error("language model error: {0}")]
    Llm(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the query execution collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("query failed: {message}")]
pub struct QueryError {
    pub message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
