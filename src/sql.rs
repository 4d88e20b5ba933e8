//! Pull the SQL query out of a model response.

use regex::Regex;
use std::sync::LazyLock;

/// First ```` ```sql ```` fenced block, tag matched case-insensitively, non-greedy body.
static SQL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```sql\s*(.+?)\s*```").expect("valid SQL block regex"));

/// Return the first fenced SQL block of `response`, trimmed.
///
/// `None` when the response has no block (or an empty one): the turn then shows
/// prose only and no query runs.
pub fn extract_sql(response: &str) -> Option<String> {
    SQL_BLOCK
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_case_tag_is_accepted() {
        let r = "Here:\n```SQL\nSELECT 1\n```";
        assert_eq!(extract_sql(r).as_deref(), Some("SELECT 1"));
    }
}
