use crate::reader::loader::{read_frame, FileFormat};
use crate::{ChartError, DataFrame, Result};

// =============================================================================
// Embedded dataset bytes
// =============================================================================
// To add new built-in datasets follow these steps:
//
// 1. Add a CSV file of your dataset to the /data/ folder
// 2. Include the text of that file in the binary, like is done
//    beneath this block.
// 3. Add a match arm in `builtin_csv()` for your dataset.
// 4. Add the dataset name to `KNOWN_DATASETS`.
// =============================================================================

#[cfg(feature = "builtin-data")]
static PENGUINS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/penguins.csv"));

#[cfg(feature = "builtin-data")]
static AIRQUALITY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/airquality.csv"
));

/// Get the embedded CSV text for a known builtin dataset.
#[cfg(feature = "builtin-data")]
fn builtin_csv(name: &str) -> Option<&'static str> {
    match name {
        "penguins" => Some(PENGUINS),
        "airquality" => Some(AIRQUALITY),
        _ => None,
    }
}

#[cfg(not(feature = "builtin-data"))]
fn builtin_csv(_name: &str) -> Option<&'static str> {
    None
}

/// Known builtin dataset names
const KNOWN_DATASETS: &[&str] = &["penguins", "airquality"];

/// Check if a dataset name is a known builtin
pub fn is_known_builtin(name: &str) -> bool {
    KNOWN_DATASETS.contains(&name)
}

/// Names of all builtin datasets
pub fn builtin_names() -> &'static [&'static str] {
    KNOWN_DATASETS
}

/// Parse a builtin dataset into a DataFrame
pub fn load_builtin_dataframe(name: &str) -> Result<DataFrame> {
    if !is_known_builtin(name) {
        return Err(ChartError::LoadError(format!(
            "Unknown builtin dataset: '{}'",
            name
        )));
    }

    let csv = builtin_csv(name).ok_or_else(|| {
        ChartError::LoadError(format!(
            "Builtin dataset '{}' is not available in this build",
            name
        ))
    })?;

    read_frame(csv.as_bytes(), FileFormat::Csv).map_err(|e| {
        ChartError::LoadError(format!("Failed to load builtin dataset '{}': {}", name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_builtins() {
        assert!(is_known_builtin("penguins"));
        assert!(is_known_builtin("airquality"));
        assert!(!is_known_builtin("Penguins"));
        assert_eq!(builtin_names().len(), 2);
    }

    #[test]
    fn test_load_builtin_unknown() {
        let err = load_builtin_dataframe("nonexistent").unwrap_err();
        assert!(err.to_string().contains("Unknown builtin dataset"));
    }
}
