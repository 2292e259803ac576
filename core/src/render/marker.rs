use crate::prelude::GeoPoint;
use crate::quality::{QualityScale, Rgb};
use crate::record::MeasurementRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill_opacity: f32,
}

/// Text shown when hovering a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub network: String,
    pub quality: String,
    pub signal_strength: Option<f64>,
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network: {}", self.network)?;
        writeln!(f, "Signal Quality: {}", self.quality)?;
        match self.signal_strength {
            Some(strength) => write!(f, "Signal Strength: {}", strength),
            None => write!(f, "Signal Strength: n/a"),
        }
    }
}

/// One renderable point handed to the map presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    pub position: GeoPoint,
    pub color: Rgb,
    pub style: MarkerStyle,
    pub tooltip: Tooltip,
}

impl MarkerDescriptor {
    /// `None` for records without a usable position.
    pub fn from_record(
        record: &MeasurementRecord,
        scale: &QualityScale,
        style: MarkerStyle,
    ) -> Option<Self> {
        Some(Self {
            position: record.position()?,
            color: scale.color(&record.signal_quality),
            style,
            tooltip: Tooltip {
                network: record.network.clone(),
                quality: record.signal_quality.clone(),
                signal_strength: record.signal_strength,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::FALLBACK_COLOR;

    const STYLE: MarkerStyle = MarkerStyle {
        radius: 3.0,
        fill_opacity: 0.7,
    };

    #[test]
    fn marker_color_comes_from_scale() {
        let scale = QualityScale::standard();
        let record = MeasurementRecord::new(10.0, 20.0, "Jazz", Some(-85.0), "Great");
        let marker = MarkerDescriptor::from_record(&record, &scale, STYLE).unwrap();
        assert_eq!(marker.color, scale.level("Great").unwrap().color);
        assert_eq!(marker.position.latitude, 10.0);
    }

    #[test]
    fn unknown_quality_marker_uses_fallback_color() {
        let scale = QualityScale::standard();
        let record = MeasurementRecord::new(10.0, 20.0, "Jazz", None, "Superb");
        let marker = MarkerDescriptor::from_record(&record, &scale, STYLE).unwrap();
        assert_eq!(marker.color, FALLBACK_COLOR);
    }

    #[test]
    fn tooltip_lists_network_quality_and_strength() {
        let tooltip = Tooltip {
            network: "Zong".into(),
            quality: "Bad".into(),
            signal_strength: Some(-101.0),
        };
        assert_eq!(
            tooltip.to_string(),
            "Network: Zong\nSignal Quality: Bad\nSignal Strength: -101"
        );
    }
}
