//! Memoization of schema summaries.
//!
//! Entries are keyed by `(table name, source identity)`, so loading a new
//! source under an existing table name never returns the old summary. Only
//! successful extractions are cached.

use std::collections::HashMap;

use crate::diagnostics::Diagnostics;
use crate::reader::Reader;
use crate::schema::{query_schema, TableSummary};

#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<(String, String), TableSummary>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached summary for an exact key
    pub fn get(&self, table: &str, source_identity: &str) -> Option<&TableSummary> {
        self.entries
            .get(&(table.to_string(), source_identity.to_string()))
    }

    /// Return the cached summary, or query the engine and remember the result.
    pub fn get_or_query(
        &mut self,
        reader: &dyn Reader,
        table: &str,
        source_identity: &str,
        sample_size: usize,
        diagnostics: &dyn Diagnostics,
    ) -> Option<TableSummary> {
        let key = (table.to_string(), source_identity.to_string());
        if let Some(summary) = self.entries.get(&key) {
            diagnostics.debug(&format!("Schema cache hit for '{}'", table));
            return Some(summary.clone());
        }

        let summary = query_schema(reader, table, sample_size, diagnostics)?;
        self.entries.insert(key, summary.clone());
        Some(summary)
    }

    /// Drop every entry for `table`, whatever its source
    pub fn invalidate(&mut self, table: &str) {
        self.entries.retain(|(name, _), _| name != table);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
