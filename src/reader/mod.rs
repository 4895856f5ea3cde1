//! Data engine abstraction layer for chartform
//!
//! The reader module provides a pluggable interface for running SQL against a
//! columnar engine and getting Polars DataFrames back, plus the loading layer
//! that puts user data into the engine as named tables.
//!
//! # Architecture
//!
//! All engines implement the `Reader` trait, which provides:
//! - SQL query execution → DataFrame conversion
//! - Table registration and replacement
//! - The SQL shapes used for schema introspection (`DESCRIBE`, sampling, row count)
//!
//! # Example
//!
//! ```rust,ignore
//! use chartform::reader::{load_table, LoadSource, PolarsReader, Reader};
//!
//! let reader = PolarsReader::new();
//! load_table(&reader, &LoadSource::Builtin("penguins".into()), "penguins")?;
//! let df = reader.execute_sql("SELECT * FROM penguins")?;
//! ```

use crate::{DataFrame, Result};

pub mod data;
pub mod loader;
pub mod polars_sql;

pub use loader::{load_table, FileFormat, LoadSource};
pub use polars_sql::PolarsReader;

/// Quote an identifier for use in generated SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Trait for data engines
///
/// Readers execute SQL queries and return Polars DataFrames.
/// They provide a uniform interface for different engine backends.
pub trait Reader {
    /// Execute a SQL query and return the result as a DataFrame
    ///
    /// # Errors
    ///
    /// Returns `ChartError::ReaderError` if:
    /// - The SQL is invalid
    /// - The table or columns don't exist
    fn execute_sql(&self, sql: &str) -> Result<DataFrame>;

    /// Register a DataFrame as a named table
    ///
    /// When `replace` is false, registering over an existing name is an error.
    fn register(&self, name: &str, df: DataFrame, replace: bool) -> Result<()>;

    /// Remove a previously registered table
    fn unregister(&self, name: &str) -> Result<()>;

    // =========================================================================
    // Introspection SQL
    // =========================================================================

    /// Schema description statement for `table`
    ///
    /// The result has one row per column with the fields
    /// `column_name, column_type, null, key, default, extra`.
    fn describe_sql(&self, table: &str) -> String {
        format!("DESCRIBE {}", quote_identifier(table))
    }

    /// Statement drawing up to `n` sample rows from `table`
    fn sample_sql(&self, table: &str, n: usize) -> String {
        format!(
            "SELECT * FROM {} USING SAMPLE {} ROWS",
            quote_identifier(table),
            n
        )
    }

    /// Statement returning the row count of `table` as a single value
    fn count_sql(&self, table: &str) -> String {
        format!("SELECT COUNT(*) AS n FROM {}", quote_identifier(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartError;

    struct NullReader;

    impl Reader for NullReader {
        fn execute_sql(&self, sql: &str) -> Result<DataFrame> {
            Err(ChartError::ReaderError(sql.to_string()))
        }

        fn register(&self, _name: &str, _df: DataFrame, _replace: bool) -> Result<()> {
            Ok(())
        }

        fn unregister(&self, _name: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_introspection_sql() {
        let reader = NullReader;
        assert_eq!(reader.describe_sql("sales"), "DESCRIBE \"sales\"");
        assert_eq!(
            reader.sample_sql("sales", 5),
            "SELECT * FROM \"sales\" USING SAMPLE 5 ROWS"
        );
        assert_eq!(
            reader.count_sql("sales"),
            "SELECT COUNT(*) AS n FROM \"sales\""
        );
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("Sales"), "\"Sales\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
