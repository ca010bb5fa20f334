pub mod loader;
pub mod series;
pub mod synthetic;
pub mod table;

pub use loader::{load_csv, load_json, read_csv, read_json};
pub use series::MarketData;
pub use synthetic::{bars_from_closes, generate_synthetic_bars};
pub use table::PriceTable;

use std::path::Path;

use common::{BacktestError, Result};

/// Load a price table from file, detecting format from extension
pub fn load_file(path: &Path) -> Result<PriceTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        _ => Err(BacktestError::DataLoadError(format!(
            "Unsupported file format: {}",
            ext
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_file_dispatches_on_extension() {
        let csv = temp_file(
            "bars.CSV",
            "Date,Open,High,Low,Close\n2024-01-01,1.0,2.0,0.5,1.5\n",
        );
        let json = temp_file(
            "bars.json",
            r#"[{"timestamp": "2024-01-01T00:00:00Z", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5}]"#,
        );

        let from_csv = load_file(&csv).unwrap();
        let from_json = load_file(&json).unwrap();
        fs::remove_file(&csv).unwrap();
        fs::remove_file(&json).unwrap();

        assert_eq!(from_csv.column(table::CLOSE).unwrap(), &[Some(1.5)]);
        assert_eq!(from_json.column(table::CLOSE).unwrap(), &[Some(1.5)]);
        assert_eq!(from_csv.index(), from_json.index());
    }

    #[test]
    fn test_load_file_rejects_unknown_extension() {
        let err = load_file(Path::new("prices.parquet")).unwrap_err();

        assert!(matches!(err, BacktestError::DataLoadError(_)));
        assert!(err.to_string().contains("parquet"));
    }

    #[test]
    fn test_load_file_missing_path() {
        let err = load_file(Path::new("/nonexistent/prices.csv")).unwrap_err();
        assert!(matches!(err, BacktestError::DataLoadError(_)));
    }
}
