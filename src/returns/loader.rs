//! Load cached daily price files
//!
//! Files are expected at `<data_dir>/<TICKER>.csv` with a date column followed
//! by a price column. Market data exports often prepend ticker/field header
//! rows before the data; any leading row whose first cell is not a date is
//! skipped. Nothing here downloads data: a missing file is an I/O error.

use super::PriceSeries;
use crate::error::{CppiError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Path of the cached price file for a ticker
pub fn ticker_path<P: AsRef<Path>>(data_dir: P, ticker: &str) -> PathBuf {
    data_dir.as_ref().join(format!("{}.csv", ticker))
}

/// Load the cached price file for a ticker from `data_dir`
pub fn load_ticker<P: AsRef<Path>>(data_dir: P, ticker: &str) -> Result<PriceSeries> {
    let path = ticker_path(data_dir, ticker);
    info!("[LOAD DATA] {} from {}", ticker, path.display());
    load_prices(&path)
}

/// Load a price series from a CSV file
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    let file = File::open(path.as_ref())?;
    load_prices_from_reader(file)
}

/// Load a price series from any reader producing CSV
pub fn load_prices_from_reader<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dates = Vec::new();
    let mut prices = Vec::new();
    let mut skipped_header_rows = 0usize;

    for record in rdr.records() {
        let record = record?;
        let date_cell = record.get(0).unwrap_or("");

        let date = match parse_date(date_cell) {
            Ok(date) => date,
            // Header and metadata rows only appear before the first data row
            Err(_) if dates.is_empty() => {
                skipped_header_rows += 1;
                continue;
            }
            Err(source) => {
                return Err(CppiError::DateParse {
                    value: date_cell.to_string(),
                    source,
                });
            }
        };

        let price_cell = record.get(1).unwrap_or("");
        let price: f64 = price_cell.parse().map_err(|_| CppiError::PriceParse {
            date: date.to_string(),
            value: price_cell.to_string(),
        })?;
        if !price.is_finite() || price <= 0.0 {
            return Err(CppiError::PriceParse {
                date: date.to_string(),
                value: price_cell.to_string(),
            });
        }

        dates.push(date);
        prices.push(price);
    }

    debug!(
        "Parsed {} price rows ({} header rows skipped)",
        prices.len(),
        skipped_header_rows
    );

    PriceSeries::new(dates, prices)
}

/// Parse the date part of a cell, ignoring any time-of-day suffix
fn parse_date(cell: &str) -> std::result::Result<NaiveDate, chrono::ParseError> {
    let date_part = cell.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(cell);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_csv() {
        let csv = "Date,Price\n2024-01-02,100.0\n2024-01-03,101.5\n2024-01-04,99.0\n";
        let prices = load_prices_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(prices.len(), 3);
        assert_eq!(prices.dates[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(prices.values[1], 101.5);
    }

    #[test]
    fn test_export_with_metadata_rows() {
        // Layout written by common market data exporters
        let csv = "Price,Price\nTicker,SPY\nDate,\n2024-01-02 00:00:00,470.5\n2024-01-03 00:00:00,467.0\n";
        let prices = load_prices_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices.dates[1], NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(prices.values[0], 470.5);
    }

    #[test]
    fn test_bad_price_rejected() {
        let csv = "Date,Price\n2024-01-02,100.0\n2024-01-03,abc\n";
        let err = load_prices_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CppiError::PriceParse { .. }));

        let csv = "Date,Price\n2024-01-02,0.0\n";
        assert!(load_prices_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_date_after_data_rejected() {
        let csv = "Date,Price\n2024-01-02,100.0\nnot-a-date,101.0\n";
        let err = load_prices_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, CppiError::DateParse { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_ticker("/nonexistent-data-dir", "SPY").unwrap_err();
        assert!(matches!(err, CppiError::Io(_)));
    }
}
