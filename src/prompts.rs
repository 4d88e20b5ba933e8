//! The rule prompt that turns the model into a single-query SQL generator.
//!
//! The prompt lists every target table in its own `<table>` block and then the
//! fixed rules. Rules 1 and 7 matter to the rest of the crate: the response must
//! carry one ```` ```sql ```` block ([`crate::sql::extract_sql`]) and dates are
//! written `DD.MM.YYYY` ([`crate::calendar::parse_day_first`]).

use crate::error::{Error, Result};
use crate::models::ResultTable;

/// Default description attached to each competition table.
pub const DEFAULT_TABLE_DESCRIPTION: &str =
    "Advertising competition metrics per brand, medium and period.";

const PREAMBLE: &str = "\
You will be acting as an AI Snowflake SQL expert for advertising competition data.
Your goal is to give correct, executable SQL queries to users.
You are given multiple tables. Each table is described in a separate <table> block with <tableName> and <columns>.
For each user question, FIRST decide which single table is appropriate and then generate ONE Snowflake SQL query using ONLY that table.";

const RULES: [&str; 13] = [
    "You MUST wrap the generated SQL code within ```sql ... ``` fences (single code block).",
    "If the user doesn't state a limit, you MUST add LIMIT 10.",
    "Text/string filters MUST use ILIKE '%keyword%'.",
    "Generate a single Snowflake SQL query (not multiple).",
    "You MUST ONLY use the table names and columns provided in the <table> blocks. Do NOT invent tables/columns.",
    "DO NOT start identifiers with numerics.",
    "Dates in the TARIH column are written day.month.year (DD.MM.YYYY), e.g. 23.08.2023 is 23 August 2023.",
    "A brand mentioned in lower case may be stored upper case with Turkish letters (\"getir\" → \"GETİR\"); search case- and diacritics-insensitively with ILIKE.",
    "When GRP is requested use the GRP column: SUM it unless an average is asked for, then AVG. Example: SELECT SUM(TRY_CAST(REPLACE(GRP, ',', '.') AS FLOAT)) AS toplam_grp FROM <table>;",
    "Getir Yemek is stored as \"GETİRYEMEK\".",
    "Use the MARKA column when searching for a brand.",
    "Brand mappings: yemeksepeti -> YEMEKSEPETI.COM; yemeksepeti market -> YEMEKSEPETI MARKET; yemeksepeti mahalle -> YEMEKSEPETI MAHALLE; trendyol yemek -> TRENDYOL YEMEK; trendyol -> TRENDYOL.COM.",
    "For budget / investment questions use NETTUTAR; outdoor, measured TV, radio, cinema and press filters go through the MECRA column.",
];

/// One table as the model sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContext {
    /// Fully qualified `DATABASE.SCHEMA.TABLE`.
    pub name: String,
    pub description: String,
    /// (column name, data type)
    pub columns: Vec<(String, String)>,
    /// (variable name, definition), optional glossary of coded values.
    pub variables: Vec<(String, String)>,
}

impl TableContext {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            columns: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Build a context from the result of [`columns_query`].
    pub fn from_columns_table(
        name: impl Into<String>,
        description: impl Into<String>,
        table: &ResultTable,
    ) -> Self {
        let mut ctx = Self::new(name, description);
        ctx.columns = pairs(table, "COLUMN_NAME", "DATA_TYPE");
        ctx
    }

    /// Fill the variable glossary from a `VARIABLE_NAME` / `DEFINITION` result.
    pub fn with_variables_table(mut self, table: &ResultTable) -> Self {
        self.variables = pairs(table, "VARIABLE_NAME", "DEFINITION");
        self
    }

    /// Render the `<table>` block.
    pub fn render(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(n, t)| format!("- **{n}**: {t}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut out = format!(
            "<table>\nHere is the table name <tableName> {name} </tableName>\n\n\
             <tableDescription>{desc}</tableDescription>\n\n\
             Here are the columns of {name}:\n<columns>\n{columns}\n</columns>\n",
            name = self.name,
            desc = self.description.trim(),
        );
        if !self.variables.is_empty() {
            let vars = self
                .variables
                .iter()
                .map(|(n, d)| format!("- **{n}**: {d}"))
                .collect::<Vec<_>>()
                .join("\n");
            out.push_str(&format!("\nAvailable variables by VARIABLE_NAME:\n{vars}\n"));
        }
        out.push_str("</table>");
        out
    }
}

fn pairs(table: &ResultTable, key: &str, value: &str) -> Vec<(String, String)> {
    match (table.column_ci(key), table.column_ci(value)) {
        (Some(k), Some(v)) => k
            .values
            .iter()
            .zip(&v.values)
            .filter(|(k, _)| !k.is_null())
            .map(|(k, v)| (k.to_text(), v.to_text()))
            .collect(),
        _ => Vec::new(),
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Split `DATABASE.SCHEMA.TABLE` into upper-cased parts.
pub fn split_table_name(name: &str) -> Result<[String; 3]> {
    let parts: Vec<&str> = name.trim().split('.').collect();
    match parts.as_slice() {
        [db, schema, table] if parts.iter().all(|p| is_identifier(p)) => Ok([
            db.to_uppercase(),
            schema.to_uppercase(),
            table.to_uppercase(),
        ]),
        _ => Err(Error::TableName(name.to_string())),
    }
}

/// INFORMATION_SCHEMA lookup of a table's columns in ordinal order.
pub fn columns_query(table_name: &str) -> Result<String> {
    let [db, schema, table] = split_table_name(table_name)?;
    Ok(format!(
        "SELECT COLUMN_NAME, DATA_TYPE\n\
         FROM {db}.INFORMATION_SCHEMA.COLUMNS\n\
         WHERE TABLE_SCHEMA = '{schema}'\n  AND TABLE_NAME   = '{table}'\n\
         ORDER BY ORDINAL_POSITION"
    ))
}

/// The full system prompt for the given tables.
pub fn system_prompt(tables: &[TableContext]) -> String {
    let context = tables
        .iter()
        .map(TableContext::render)
        .collect::<Vec<_>>()
        .join("\n\n");
    let rules = RULES
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{PREAMBLE}\n\n{context}\n\nHere are the critical rules:\n<rules>\n{rules}\n</rules>\n\n\
         Always include exactly one SQL query block in your response."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_reject_injection() {
        assert!(split_table_name("DB.PUBLIC.T1").is_ok());
        assert!(split_table_name("DB.PUBLIC.T1'; DROP TABLE X;--").is_err());
        assert!(split_table_name("PUBLIC.T1").is_err());
        assert!(split_table_name("1DB.PUBLIC.T").is_err());
    }
}
