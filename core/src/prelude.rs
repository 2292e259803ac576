use crate::record::MeasurementRecord;
use serde::{Deserialize, Serialize};

/// Rendering defaults shared by every pass of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub fallback_center: GeoPoint,
    pub zoom: u8,
    pub marker_radius: f32,
    pub fill_opacity: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback_center: GeoPoint {
                latitude: 33.6844,
                longitude: 73.0479,
            },
            zoom: 10,
            marker_radius: 3.0,
            fill_opacity: 0.7,
        }
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Common error type for the coverage core.
#[derive(thiserror::Error, Debug)]
pub enum CoverageError {
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("invalid quality scale: {0}")]
    InvalidScale(String),
}

pub type CoverageResult<T> = Result<T, CoverageError>;

/// Predicate-style stage that narrows a record sequence without reordering it.
pub trait RecordFilter {
    fn keep(&self, record: &MeasurementRecord) -> bool;

    fn apply<'a, I>(&self, records: I) -> Vec<&'a MeasurementRecord>
    where
        I: IntoIterator<Item = &'a MeasurementRecord>,
    {
        records
            .into_iter()
            .filter(|record| self.keep(record))
            .collect()
    }
}
