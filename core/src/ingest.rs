//! CSV parsing for the record store.
//!
//! Header names are matched after trimming and without regard to case, so
//! `" Signal Quality"` and `"signal quality"` both resolve. Rows whose
//! coordinates are missing or malformed are skipped and counted rather than
//! failing the batch.

use crate::prelude::{CoverageError, CoverageResult};
use crate::record::MeasurementRecord;
use crate::telemetry::log::LogManager;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

pub const COLUMN_LONGITUDE: &str = "X";
pub const COLUMN_LATITUDE: &str = "Y";
pub const COLUMN_NETWORK: &str = "Network";
pub const COLUMN_STRENGTH: &str = "Signal Strength";
pub const COLUMN_QUALITY: &str = "Signal Quality";

/// Records kept from one load together with the number of rows dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<MeasurementRecord>,
    pub skipped: usize,
}

struct ColumnMap {
    longitude: usize,
    latitude: usize,
    network: usize,
    strength: Option<usize>,
    quality: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> CoverageResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| normalize_header(header) == normalize_header(name))
        };
        let require =
            |name: &str| find(name).ok_or_else(|| CoverageError::MissingColumn(name.to_string()));

        Ok(Self {
            longitude: require(COLUMN_LONGITUDE)?,
            latitude: require(COLUMN_LATITUDE)?,
            network: require(COLUMN_NETWORK)?,
            strength: find(COLUMN_STRENGTH),
            quality: require(COLUMN_QUALITY)?,
        })
    }

    fn build(&self, row: &StringRecord) -> Option<MeasurementRecord> {
        let coordinate = |index: usize| row.get(index)?.trim().parse::<f64>().ok();
        let longitude = coordinate(self.longitude)?;
        let latitude = coordinate(self.latitude)?;

        let network = row.get(self.network)?.trim();
        if network.is_empty() {
            return None;
        }
        let signal_strength = self
            .strength
            .and_then(|index| row.get(index))
            .and_then(|value| value.trim().parse::<f64>().ok());
        let signal_quality = row.get(self.quality).unwrap_or_default().trim();

        let record = MeasurementRecord::new(
            latitude,
            longitude,
            network,
            signal_strength,
            signal_quality,
        );
        record.is_located().then_some(record)
    }
}

/// Collapses inner whitespace runs and lowercases.
fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn parse_records<R: Read>(reader: R) -> CoverageResult<LoadReport> {
    let logger = LogManager::new("coveragecore::ingest");
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut report = LoadReport::default();
    for (line, row) in csv_reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                logger.detail(&format!("row {} unreadable: {}", line + 1, err));
                report.skipped += 1;
                continue;
            }
        };
        match columns.build(&row) {
            Some(record) => report.records.push(record),
            None => {
                logger.detail(&format!("row {} has no usable position", line + 1));
                report.skipped += 1;
            }
        }
    }

    logger.record(&format!(
        "loaded {} records ({} skipped)",
        report.records.len(),
        report.skipped
    ));
    Ok(report)
}
