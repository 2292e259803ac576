use crate::prelude::GeoPoint;
use serde::{Deserialize, Serialize};

/// One geotagged signal reading as delivered by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub network: String,
    #[serde(default)]
    pub signal_strength: Option<f64>,
    pub signal_quality: String,
}

impl MeasurementRecord {
    pub fn new(
        latitude: f64,
        longitude: f64,
        network: impl Into<String>,
        signal_strength: Option<f64>,
        signal_quality: impl Into<String>,
    ) -> Self {
        Self {
            longitude,
            latitude,
            network: network.into(),
            signal_strength,
            signal_quality: signal_quality.into(),
        }
    }

    /// Finite coordinates inside the WGS84 degree ranges.
    pub fn is_located(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.is_located().then_some(GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}
