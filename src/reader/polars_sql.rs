//! Polars SQL context data engine
//!
//! Provides a reader that uses Polars' built-in SQL context for querying
//! registered DataFrames. `DESCRIBE` and `USING SAMPLE n ROWS` are answered by
//! the reader itself from the registered frame, using the same result shape a
//! database engine reports.

use crate::reader::{quote_identifier, Reader};
use crate::{ChartError, DataFrame, Result};
use polars::prelude::*;
use polars::sql::SQLContext;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Matches `DESCRIBE table` and `DESCRIBE "table"`
static DESCRIBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)^\s*DESCRIBE\s+(?:"((?:[^"]|"")+)"|([A-Za-z_][A-Za-z0-9_]*))\s*;?\s*$"#)
        .expect("DESCRIBE pattern is valid")
});

/// Matches `SELECT * FROM table USING SAMPLE n ROWS`
static SAMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)^\s*SELECT\s+\*\s+FROM\s+(?:"((?:[^"]|"")+)"|([A-Za-z_][A-Za-z0-9_]*))\s+USING\s+SAMPLE\s+(\d+)\s+ROWS\s*;?\s*$"#,
    )
    .expect("SAMPLE pattern is valid")
});

/// Table name from a quoted (group 1) or bare (group 2) identifier capture
fn captured_table(caps: &regex::Captures, sql: &str) -> Result<String> {
    match (caps.get(1), caps.get(2)) {
        (Some(quoted), _) => Ok(quoted.as_str().replace("\"\"", "\"")),
        (None, Some(bare)) => Ok(bare.as_str().to_string()),
        (None, None) => Err(ChartError::ReaderError(format!(
            "Malformed statement: {}",
            sql
        ))),
    }
}

/// Polars SQL context reader
///
/// A pure in-memory engine with no external database connection.
///
/// # Examples
///
/// ```rust,ignore
/// use chartform::reader::{Reader, PolarsReader};
/// use polars::prelude::*;
///
/// let reader = PolarsReader::new();
/// let df = df! {
///     "x" => [1, 2, 3],
///     "y" => [10, 20, 30],
/// }?;
/// reader.register("data", df, false)?;
///
/// let result = reader.execute_sql("SELECT * FROM data WHERE x > 1")?;
/// let schema = reader.execute_sql("DESCRIBE data")?;
/// ```
pub struct PolarsReader {
    ctx: RefCell<SQLContext>,
    registered_tables: RefCell<HashSet<String>>,
}

impl PolarsReader {
    /// Create a new Polars reader with an empty SQL context
    pub fn new() -> Self {
        Self {
            ctx: RefCell::new(SQLContext::new()),
            registered_tables: RefCell::new(HashSet::new()),
        }
    }

    /// Check if a table is registered
    pub fn table_exists(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// List registered table names, sorted
    ///
    /// When `internal` is false, filters out internal tables (prefixed with `__chartform_`).
    pub fn list_tables(&self, internal: bool) -> Vec<String> {
        let mut tables: Vec<String> = self
            .registered_tables
            .borrow()
            .iter()
            .filter(|name| internal || !crate::naming::is_internal_table(name))
            .cloned()
            .collect();
        tables.sort();
        tables
    }

    /// Build the `DESCRIBE` result for a registered table.
    fn describe(&self, table: &str) -> Result<DataFrame> {
        if !self.table_exists(table) {
            return Err(ChartError::ReaderError(format!(
                "Table '{}' does not exist",
                table
            )));
        }

        // LIMIT 0 resolves the schema without reading data
        let empty = self.run(&format!(
            "SELECT * FROM {} LIMIT 0",
            quote_identifier(table)
        ))?;

        let columns = empty.get_columns();
        let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
        let types: Vec<String> = columns.iter().map(|c| engine_type_name(c.dtype())).collect();

        // Polars frames carry no constraint metadata
        let absent: Vec<Option<String>> = vec![None; names.len()];

        DataFrame::new(vec![
            Column::new("column_name".into(), names),
            Column::new("column_type".into(), types),
            Column::new("null".into(), absent.clone()),
            Column::new("key".into(), absent.clone()),
            Column::new("default".into(), absent.clone()),
            Column::new("extra".into(), absent),
        ])
        .map_err(|e| ChartError::ReaderError(format!("Failed to build DESCRIBE result: {}", e)))
    }

    /// Draw up to `n` random rows from a registered table.
    ///
    /// Every call draws a fresh sample; tables smaller than `n` are returned
    /// whole, in shuffled order.
    fn sample(&self, table: &str, n: usize) -> Result<DataFrame> {
        if !self.table_exists(table) {
            return Err(ChartError::ReaderError(format!(
                "Table '{}' does not exist",
                table
            )));
        }

        let full = self.run(&format!("SELECT * FROM {}", quote_identifier(table)))?;
        let n = n.min(full.height());
        full.sample_n_literal(n, false, true, None).map_err(|e| {
            ChartError::ReaderError(format!("Failed to sample table '{}': {}", table, e))
        })
    }

    fn run(&self, sql: &str) -> Result<DataFrame> {
        // Execute the query - this returns a LazyFrame
        let lazy_frame = self.ctx.borrow_mut().execute(sql).map_err(|e| {
            ChartError::ReaderError(format!("Failed to execute SQL `{}`: {}", sql, e))
        })?;

        lazy_frame.collect().map_err(|e| {
            ChartError::ReaderError(format!("Failed to collect query result: {}", e))
        })
    }
}

impl Default for PolarsReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine type name reported by `DESCRIBE` for a Polars dtype
pub fn engine_type_name(dtype: &DataType) -> String {
    let name = match dtype {
        DataType::Boolean => "BOOLEAN",
        DataType::Int8 => "TINYINT",
        DataType::Int16 => "SMALLINT",
        DataType::Int32 => "INTEGER",
        DataType::Int64 => "BIGINT",
        DataType::UInt8 => "UTINYINT",
        DataType::UInt16 => "USMALLINT",
        DataType::UInt32 => "UINTEGER",
        DataType::UInt64 => "UBIGINT",
        DataType::Float32 => "FLOAT",
        DataType::Float64 => "DOUBLE",
        DataType::String => "VARCHAR",
        DataType::Binary => "BLOB",
        DataType::Date => "DATE",
        DataType::Datetime(_, None) => "TIMESTAMP",
        DataType::Datetime(_, Some(_)) => "TIMESTAMP WITH TIME ZONE",
        DataType::Time => "TIME",
        DataType::Duration(_) => "INTERVAL",
        DataType::List(_) => "LIST",
        DataType::Null => "NULL",
        other => return other.to_string().to_uppercase(),
    };
    name.to_string()
}

/// Validate a table name
fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ChartError::ReaderError("Table name cannot be empty".into()));
    }

    // Reject characters that could break identifiers
    let forbidden = ['"', '\0', '\n', '\r'];
    for ch in forbidden {
        if name.contains(ch) {
            return Err(ChartError::ReaderError(format!(
                "Table name '{}' contains invalid character '{}'",
                name,
                ch.escape_default()
            )));
        }
    }

    if name.len() > 128 {
        return Err(ChartError::ReaderError(format!(
            "Table name '{}' exceeds maximum length of 128 characters",
            name
        )));
    }

    Ok(())
}

impl Reader for PolarsReader {
    fn execute_sql(&self, sql: &str) -> Result<DataFrame> {
        // Polars SQL context doesn't support DDL
        let trimmed = sql.trim().to_uppercase();
        let is_ddl = trimmed.starts_with("CREATE ")
            || trimmed.starts_with("DROP ")
            || trimmed.starts_with("INSERT ")
            || trimmed.starts_with("UPDATE ")
            || trimmed.starts_with("DELETE ")
            || trimmed.starts_with("ALTER ");

        if is_ddl {
            return Err(ChartError::ReaderError(format!(
                "Polars SQL context does not support DDL statements. Use register() to add tables. {}",
                sql
            )));
        }

        if let Some(caps) = DESCRIBE_RE.captures(sql) {
            let table = captured_table(&caps, sql)?;
            return self.describe(&table);
        }

        if let Some(caps) = SAMPLE_RE.captures(sql) {
            let table = captured_table(&caps, sql)?;
            let n = caps[3].parse::<usize>().map_err(|e| {
                ChartError::ReaderError(format!("Invalid sample size in `{}`: {}", sql, e))
            })?;
            return self.sample(&table, n);
        }

        self.run(sql)
    }

    fn register(&self, name: &str, df: DataFrame, replace: bool) -> Result<()> {
        validate_table_name(name)?;

        if self.table_exists(name) {
            if replace {
                self.ctx.borrow_mut().unregister(name);
                self.registered_tables.borrow_mut().remove(name);
            } else {
                return Err(ChartError::ReaderError(format!(
                    "Table '{}' already exists",
                    name
                )));
            }
        }

        // Polars SQLContext takes a LazyFrame
        self.ctx.borrow_mut().register(name, df.lazy());
        self.registered_tables.borrow_mut().insert(name.to_string());

        Ok(())
    }

    fn unregister(&self, name: &str) -> Result<()> {
        // Only allow unregistering tables we created via register()
        if !self.table_exists(name) {
            return Err(ChartError::ReaderError(format!(
                "Table '{}' was not registered via this reader",
                name
            )));
        }

        self.ctx.borrow_mut().unregister(name);
        self.registered_tables.borrow_mut().remove(name);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn test_register_and_query() {
        let reader = PolarsReader::new();

        let df = df! {
            "x" => [1i32, 2, 3],
            "y" => [10i32, 20, 30],
        }
        .unwrap();

        reader.register("my_table", df, false).unwrap();

        let result = reader
            .execute_sql("SELECT * FROM my_table ORDER BY x")
            .unwrap();
        assert_eq!(result.shape(), (3, 2));
        assert_eq!(result.get_column_names(), vec!["x", "y"]);
    }

    #[test]
    fn test_register_duplicate_name_errors() {
        let reader = PolarsReader::new();

        let df1 = df! { "a" => [1i32] }.unwrap();
        let df2 = df! { "b" => [2i32] }.unwrap();

        reader.register("dup_table", df1, false).unwrap();

        let result = reader.register("dup_table", df2, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[test]
    fn test_register_replace_swaps_table() {
        let reader = PolarsReader::new();

        reader
            .register("data", df! { "a" => [1i32, 2] }.unwrap(), false)
            .unwrap();
        reader
            .register("data", df! { "b" => ["x", "y", "z"] }.unwrap(), true)
            .unwrap();

        let result = reader.execute_sql("SELECT * FROM data").unwrap();
        assert_eq!(result.get_column_names(), vec!["b"]);
        assert_eq!(result.height(), 3);
        assert_eq!(reader.list_tables(false), vec!["data".to_string()]);
    }

    #[test]
    fn test_register_invalid_table_names() {
        let reader = PolarsReader::new();
        let df = df! { "a" => [1i32] }.unwrap();

        let result = reader.register("", df.clone(), false);
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));

        let result = reader.register("bad\"name", df.clone(), false);
        assert!(result.unwrap_err().to_string().contains("invalid character"));

        let result = reader.register("bad\nname", df.clone(), false);
        assert!(result.unwrap_err().to_string().contains("invalid character"));

        let long_name = "a".repeat(200);
        let result = reader.register(&long_name, df, false);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("exceeds maximum length"));
    }

    #[test]
    fn test_unregister() {
        let reader = PolarsReader::new();
        let df = df! { "x" => [1i32, 2, 3] }.unwrap();

        reader.register("test_data", df, false).unwrap();
        assert_eq!(reader.execute_sql("SELECT * FROM test_data").unwrap().height(), 3);

        reader.unregister("test_data").unwrap();
        assert!(reader.execute_sql("SELECT * FROM test_data").is_err());

        let err = reader.unregister("test_data").unwrap_err().to_string();
        assert!(err.contains("was not registered via this reader"));
    }

    #[test]
    fn test_ddl_not_supported() {
        let reader = PolarsReader::new();

        let result = reader.execute_sql("CREATE TABLE test (x INT)");
        assert!(result.unwrap_err().to_string().contains("DDL"));
        assert!(reader.execute_sql("DROP TABLE test").is_err());
        assert!(reader.execute_sql("INSERT INTO test VALUES (1)").is_err());
    }

    #[test]
    fn test_invalid_sql() {
        let reader = PolarsReader::new();
        assert!(reader.execute_sql("INVALID SQL SYNTAX").is_err());
    }

    #[test]
    fn test_describe_reports_engine_shape() {
        let reader = PolarsReader::new();
        let df = df! {
            "id" => [1i64, 2],
            "price" => [1.5f64, 2.5],
            "name" => ["a", "b"],
            "active" => [true, false],
        }
        .unwrap();
        reader.register("items", df, false).unwrap();

        let described = reader.execute_sql(&reader.describe_sql("items")).unwrap();
        assert_eq!(
            described.get_column_names(),
            vec!["column_name", "column_type", "null", "key", "default", "extra"]
        );
        assert_eq!(described.height(), 4);
        assert_eq!(
            column_strings(&described, "column_name"),
            vec![
                Some("id".to_string()),
                Some("price".to_string()),
                Some("name".to_string()),
                Some("active".to_string())
            ]
        );
        assert_eq!(
            column_strings(&described, "column_type"),
            vec![
                Some("BIGINT".to_string()),
                Some("DOUBLE".to_string()),
                Some("VARCHAR".to_string()),
                Some("BOOLEAN".to_string())
            ]
        );
        assert_eq!(column_strings(&described, "null"), vec![None; 4]);
        assert_eq!(column_strings(&described, "key"), vec![None; 4]);
    }

    #[test]
    fn test_describe_unquoted_and_missing_table() {
        let reader = PolarsReader::new();
        reader
            .register("t1", df! { "a" => [1i32] }.unwrap(), false)
            .unwrap();

        let described = reader.execute_sql("describe t1;").unwrap();
        assert_eq!(described.height(), 1);

        let err = reader.execute_sql("DESCRIBE \"nope\"").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_sample_and_count_sql() {
        let reader = PolarsReader::new();
        let df = df! { "x" => [1i32, 2, 3, 4, 5, 6, 7] }.unwrap();
        reader.register("nums", df, false).unwrap();

        let sample = reader.execute_sql(&reader.sample_sql("nums", 5)).unwrap();
        assert_eq!(sample.height(), 5);

        let small = reader.execute_sql(&reader.sample_sql("nums", 50)).unwrap();
        assert_eq!(small.height(), 7);

        let count = reader.execute_sql(&reader.count_sql("nums")).unwrap();
        assert_eq!(count.shape(), (1, 1));
    }

    #[test]
    fn test_sample_draws_random_rows() {
        let reader = PolarsReader::new();
        let values: Vec<i64> = (0..1000).collect();
        let df = df! { "a" => values }.unwrap();
        reader.register("big", df, false).unwrap();

        let mut seen = HashSet::new();
        for _ in 0..10 {
            let sample = reader.execute_sql(&reader.sample_sql("big", 5)).unwrap();
            assert_eq!(sample.height(), 5);
            let rows: Vec<i64> = sample
                .column("a")
                .unwrap()
                .as_materialized_series()
                .i64()
                .unwrap()
                .into_no_null_iter()
                .collect();
            seen.insert(rows);
        }
        assert!(seen.len() > 1, "every sample was identical: {:?}", seen);
    }

    #[test]
    fn test_sample_of_small_table_returns_every_row() {
        let reader = PolarsReader::new();
        reader
            .register("few", df! { "a" => [3i64, 1, 2] }.unwrap(), false)
            .unwrap();

        let sample = reader
            .execute_sql("select * from \"few\" using sample 10 rows;")
            .unwrap();
        let mut rows: Vec<i64> = sample
            .column("a")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        rows.sort();
        assert_eq!(rows, vec![1, 2, 3]);

        let err = reader
            .execute_sql(&reader.sample_sql("missing", 5))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_engine_type_names() {
        assert_eq!(engine_type_name(&DataType::Int32), "INTEGER");
        assert_eq!(engine_type_name(&DataType::UInt8), "UTINYINT");
        assert_eq!(engine_type_name(&DataType::Float32), "FLOAT");
        assert_eq!(engine_type_name(&DataType::Date), "DATE");
        assert_eq!(
            engine_type_name(&DataType::Datetime(TimeUnit::Microseconds, None)),
            "TIMESTAMP"
        );
        assert_eq!(engine_type_name(&DataType::Time), "TIME");
        assert_eq!(engine_type_name(&DataType::Null), "NULL");
    }

    #[test]
    fn test_list_tables_hides_internal() {
        let reader = PolarsReader::new();
        let df = df! { "a" => [1i32] }.unwrap();
        reader.register("visible", df.clone(), false).unwrap();
        reader
            .register(&crate::naming::builtin_data_table("penguins"), df, false)
            .unwrap();

        assert_eq!(reader.list_tables(false), vec!["visible".to_string()]);
        assert_eq!(reader.list_tables(true).len(), 2);
    }
}
