use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use common::{BacktestError, Result};
use serde::Deserialize;

use super::table::{PriceTable, CLOSE, HIGH, LOW, OPEN, VOLUME};

/// Load a price table from a CSV file
pub fn load_csv(path: &Path) -> Result<PriceTable> {
    let file = File::open(path).map_err(|e| BacktestError::DataLoadError(e.to_string()))?;
    read_csv(BufReader::new(file))
}

/// Parse CSV with the timestamp index in the first column.
///
/// Remaining headers are matched case-insensitively against
/// Open/High/Low/Close/Volume; other columns are ignored. Empty cells and
/// `nan`/`null`/`na` become nulls.
pub fn read_csv<R: Read>(reader: R) -> Result<PriceTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| BacktestError::CsvError(e.to_string()))?
        .clone();

    let known: Vec<(usize, &'static str)> = headers
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(pos, name)| canonical_column(name).map(|c| (pos, c)))
        .collect();

    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); known.len()];

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| BacktestError::CsvError(e.to_string()))?;

        // +2: header line and 1-based numbering
        let line = line + 2;
        let raw_ts = match record.get(0) {
            Some(ts) if !ts.is_empty() => ts,
            _ => {
                return Err(BacktestError::CsvError(format!(
                    "Missing timestamp on line {}",
                    line
                )))
            }
        };
        index.push(parse_timestamp(raw_ts)?);

        for (values, &(pos, column)) in columns.iter_mut().zip(&known) {
            values.push(parse_cell(record.get(pos), column, line)?);
        }
    }

    let mut table = PriceTable::new(index);
    for ((_, column), values) in known.into_iter().zip(columns) {
        table.insert_column(column, values);
    }

    Ok(table)
}

#[derive(Debug, Deserialize)]
struct JsonBar {
    #[serde(alias = "Timestamp", alias = "date", alias = "Date")]
    timestamp: DateTime<Utc>,
    #[serde(default, alias = "Open")]
    open: Option<f64>,
    #[serde(default, alias = "High")]
    high: Option<f64>,
    #[serde(default, alias = "Low")]
    low: Option<f64>,
    #[serde(default, alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Volume")]
    volume: Option<f64>,
}

/// Load a price table from a JSON array of bar records
pub fn load_json(path: &Path) -> Result<PriceTable> {
    let file = File::open(path).map_err(|e| BacktestError::DataLoadError(e.to_string()))?;
    read_json(BufReader::new(file))
}

pub fn read_json<R: Read>(reader: R) -> Result<PriceTable> {
    let rows: Vec<JsonBar> = serde_json::from_reader(reader)?;

    let mut table = PriceTable::new(rows.iter().map(|r| r.timestamp).collect())
        .with_column(OPEN, rows.iter().map(|r| r.open).collect())
        .with_column(HIGH, rows.iter().map(|r| r.high).collect())
        .with_column(LOW, rows.iter().map(|r| r.low).collect())
        .with_column(CLOSE, rows.iter().map(|r| r.close).collect());

    // Volume stays absent unless at least one record carries it
    if rows.iter().any(|r| r.volume.is_some()) {
        table.insert_column(VOLUME, rows.iter().map(|r| r.volume).collect());
    }

    Ok(table)
}

fn canonical_column(header: &str) -> Option<&'static str> {
    [OPEN, HIGH, LOW, CLOSE, VOLUME]
        .into_iter()
        .find(|c| c.eq_ignore_ascii_case(header))
}

fn parse_cell(raw: Option<&str>, column: &str, line: usize) -> Result<Option<f64>> {
    let raw = match raw {
        Some(s) => s,
        None => return Ok(None),
    };

    if raw.is_empty() || ["nan", "null", "na"].iter().any(|n| n.eq_ignore_ascii_case(raw)) {
        return Ok(None);
    }

    raw.parse::<f64>().map(Some).map_err(|_| {
        BacktestError::CsvError(format!(
            "Invalid {} value '{}' on line {}",
            column, raw, line
        ))
    })
}

/// Parse timestamp from various formats
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    // Try ISO 8601 format first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for fmt in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
        }
    }

    // Try Unix timestamp (seconds)
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(BacktestError::CsvError(format!(
        "Unable to parse timestamp: {}",
        s
    )))
}
