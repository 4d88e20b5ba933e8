//! Query execution collaborator.
//!
//! The warehouse connection is out of this crate's hands: a [`QueryExecutor`]
//! takes SQL text and hands back a [`ResultTable`] or a [`QueryError`] whose
//! message is shown to the user as is.

use crate::error::QueryError;
use crate::models::ResultTable;
use crate::storage::read_csv;
use log::debug;
use std::io::Write;
use std::process::{Command, Stdio};

pub trait QueryExecutor {
    fn execute(&self, sql: &str) -> Result<ResultTable, QueryError>;
}

impl<F> QueryExecutor for F
where
    F: Fn(&str) -> Result<ResultTable, QueryError>,
{
    fn execute(&self, sql: &str) -> Result<ResultTable, QueryError> {
        self(sql)
    }
}

/// Runs an external program per query: SQL goes to its stdin, CSV with a header
/// row is read from its stdout. A non-zero exit turns stderr into the error.
///
/// Works with any warehouse CLI that can print CSV, e.g.
/// `snowsql -o output_format=csv -o header=true -o friendly=false -o timing=false`.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a shell-like command line on whitespace. Quoting is not interpreted.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl QueryExecutor for CommandExecutor {
    fn execute(&self, sql: &str) -> Result<ResultTable, QueryError> {
        debug!("running {} for query", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| QueryError::new(format!("cannot start {}: {}", self.program, e)))?;

        // stdin closes at the end of this statement, so the child sees EOF even
        // when the write failed; it is always reaped below.
        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(sql.as_bytes()),
            None => Ok(()),
        };
        let output = child
            .wait_with_output()
            .map_err(|e| QueryError::new(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("{} exited with {}", self.program, output.status),
                s => s.to_string(),
            };
            return Err(QueryError::new(message));
        }
        sent.map_err(|e| QueryError::new(format!("cannot send query: {}", e)))?;
        read_csv(output.stdout.as_slice()).map_err(|e| QueryError::new(e.to_string()))
    }
}
