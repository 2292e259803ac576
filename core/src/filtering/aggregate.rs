use crate::filtering::viewport::ViewportSelection;
use crate::math::stats::StatsHelper;
use crate::quality::QualityScale;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoverageSummary {
    /// No viewport has been reported yet.
    Pending,
    /// The viewport holds no record with a ranked quality.
    NoData,
    Averaged {
        quality: String,
        mean_rank: f64,
        samples: usize,
    },
}

impl CoverageSummary {
    pub fn label(&self) -> String {
        match self {
            CoverageSummary::Pending => "Zoom or pan the map to update".into(),
            CoverageSummary::NoData => "No data in view".into(),
            CoverageSummary::Averaged { quality, .. } => format!("Average quality: {}", quality),
        }
    }

    pub fn quality(&self) -> Option<&str> {
        match self {
            CoverageSummary::Averaged { quality, .. } => Some(quality),
            _ => None,
        }
    }
}

/// Maps the mean rank of a viewport selection back to the nearest quality level.
pub struct QualityAggregator<'s> {
    scale: &'s QualityScale,
    logger: LogManager,
}

impl<'s> QualityAggregator<'s> {
    pub fn new(scale: &'s QualityScale) -> Self {
        Self {
            scale,
            logger: LogManager::new("coveragecore::aggregate"),
        }
    }

    pub fn aggregate(&self, selection: &ViewportSelection<'_>) -> CoverageSummary {
        let Some(records) = selection.records() else {
            return CoverageSummary::Pending;
        };

        let ranks: Vec<f64> = records
            .iter()
            .filter_map(|record| self.scale.rank(&record.signal_quality))
            .map(f64::from)
            .collect();
        let unranked = records.len() - ranks.len();
        if unranked > 0 {
            self.logger.detail(&format!(
                "{} records without a known quality excluded from average",
                unranked
            ));
        }

        let Some(mean_rank) = StatsHelper::mean(ranks.iter().copied()) else {
            return CoverageSummary::NoData;
        };

        match self.scale.nearest(mean_rank) {
            Some(level) => CoverageSummary::Averaged {
                quality: level.name.clone(),
                mean_rank,
                samples: ranks.len(),
            },
            None => CoverageSummary::NoData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::viewport::select_in_viewport;
    use crate::record::{MeasurementRecord, ViewportBound};

    #[test]
    fn undetermined_selection_is_pending() {
        let scale = QualityScale::standard();
        let records = vec![MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Great")];
        let selection = select_in_viewport(&records, None);
        assert_eq!(
            QualityAggregator::new(&scale).aggregate(&selection),
            CoverageSummary::Pending
        );
    }

    #[test]
    fn empty_selection_is_no_data() {
        let scale = QualityScale::standard();
        let selection = ViewportSelection::Selected(Vec::new());
        assert_eq!(
            QualityAggregator::new(&scale).aggregate(&selection),
            CoverageSummary::NoData
        );
    }

    #[test]
    fn unknown_qualities_are_excluded() {
        let scale = QualityScale::standard();
        let records = vec![
            MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Excellent"),
            MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Bad"),
        ];
        let bound = ViewportBound::new(0.0, 2.0, 0.0, 2.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        match QualityAggregator::new(&scale).aggregate(&selection) {
            CoverageSummary::Averaged {
                quality, samples, ..
            } => {
                assert_eq!(quality, "Bad");
                assert_eq!(samples, 1);
            }
            other => panic!("unexpected summary {:?}", other),
        }
    }

    #[test]
    fn only_unknown_qualities_is_no_data() {
        let scale = QualityScale::standard();
        let records = vec![MeasurementRecord::new(1.0, 1.0, "Jazz", None, "???")];
        let bound = ViewportBound::new(0.0, 2.0, 0.0, 2.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        assert_eq!(
            QualityAggregator::new(&scale).aggregate(&selection),
            CoverageSummary::NoData
        );
    }

    #[test]
    fn mean_rounds_to_nearest_level() {
        let scale = QualityScale::standard();
        let records = vec![
            MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Bad"),
            MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Great"),
            MeasurementRecord::new(1.0, 1.0, "Jazz", None, "Bad"),
        ];
        let bound = ViewportBound::new(0.0, 2.0, 0.0, 2.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        let summary = QualityAggregator::new(&scale).aggregate(&selection);
        assert_eq!(summary.quality(), Some("Moderate"));
        assert_eq!(summary.label(), "Average quality: Moderate");
    }
}
