//! Centralized naming conventions for chartform-generated identifiers.
//!
//! All synthetic field names and table names use a double-underscore
//! prefix/suffix pattern to avoid collision with user-defined column names.
//!
//! # Categories
//!
//! - **Sentinel fields**: Reserved selector values that are not real columns (`__chartform_count__`)
//! - **Preview fields**: Helper fields produced by the table preview transforms (`__chartform_row__`, ...)
//! - **Builtin tables**: Default table names for bundled datasets (`__chartform_data_<name>__`)

use const_format::concatcp;

// ============================================================================
// Base Building Blocks
// ============================================================================

/// Base prefix for all chartform identifiers
const CHARTFORM_PREFIX: &str = "__chartform_";

/// Suffix for all chartform identifiers (double underscore)
const CHARTFORM_SUFFIX: &str = "__";

/// Full prefix for builtin data tables: `__chartform_data_`
const DATA_PREFIX: &str = concatcp!(CHARTFORM_PREFIX, "data_");

// ============================================================================
// Sentinels and Labels
// ============================================================================

/// Reserved y-field meaning "aggregate row count" instead of a column reference.
pub const COUNT_FIELD: &str = concatcp!(CHARTFORM_PREFIX, "count", CHARTFORM_SUFFIX);

/// Y-axis label used when the count sentinel is selected.
pub const COUNT_LABEL: &str = "Count of Records";

// ============================================================================
// Preview Table Fields
// ============================================================================

/// Row number assigned by the preview table's window transform
pub const PREVIEW_ROW_FIELD: &str = concatcp!(CHARTFORM_PREFIX, "row", CHARTFORM_SUFFIX);

/// Column-name field produced by folding the preview table
pub const PREVIEW_KEY_FIELD: &str = concatcp!(CHARTFORM_PREFIX, "column", CHARTFORM_SUFFIX);

/// Cell-value field produced by folding the preview table
pub const PREVIEW_VALUE_FIELD: &str = concatcp!(CHARTFORM_PREFIX, "value", CHARTFORM_SUFFIX);

// ============================================================================
// Constructor Functions
// ============================================================================

/// Generate the default table name for a builtin dataset.
///
/// Format: `__chartform_data_<name>__`
///
/// # Example
/// ```
/// use chartform::naming;
/// assert_eq!(naming::builtin_data_table("penguins"), "__chartform_data_penguins__");
/// ```
pub fn builtin_data_table(name: &str) -> String {
    format!("{}{}{}", DATA_PREFIX, name, CHARTFORM_SUFFIX)
}

// ============================================================================
// Detection Functions
// ============================================================================

/// Check if a y-field selection is the count sentinel.
///
/// # Example
/// ```
/// use chartform::naming;
/// assert!(naming::is_count_field(naming::COUNT_FIELD));
/// assert!(!naming::is_count_field("count"));
/// ```
pub fn is_count_field(name: &str) -> bool {
    name == COUNT_FIELD
}

/// Check if a table name is internal (created for a builtin dataset).
pub fn is_internal_table(name: &str) -> bool {
    name.starts_with(CHARTFORM_PREFIX)
}
