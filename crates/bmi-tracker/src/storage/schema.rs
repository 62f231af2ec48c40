//! `SQLite` schema definitions for bmi-tracker.

/// SQL statement to create the observations table.
///
/// Timestamps are RFC 3339 UTC text, so lexical order is chronological.
pub const CREATE_OBSERVATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS bmi_observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    weight REAL NOT NULL,
    height REAL NOT NULL,
    bmi REAL NOT NULL,
    timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
";

/// SQL statement to create an index matching the history query order.
pub const CREATE_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_bmi_observations_timestamp
ON bmi_observations(timestamp DESC, id DESC)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_OBSERVATIONS_TABLE, CREATE_TIMESTAMP_INDEX];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_create_observations_table_contains_required_columns() {
        assert!(CREATE_OBSERVATIONS_TABLE.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(CREATE_OBSERVATIONS_TABLE.contains("weight REAL NOT NULL"));
        assert!(CREATE_OBSERVATIONS_TABLE.contains("height REAL NOT NULL"));
        assert!(CREATE_OBSERVATIONS_TABLE.contains("bmi REAL NOT NULL"));
        assert!(CREATE_OBSERVATIONS_TABLE.contains("timestamp TEXT NOT NULL"));
    }
}
