use crate::prelude::RecordFilter;
use crate::record::MeasurementRecord;
use std::collections::BTreeSet;

/// Keeps located records of one network, matched exactly and case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFilter {
    network: String,
}

impl NetworkFilter {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
        }
    }
}

impl RecordFilter for NetworkFilter {
    fn keep(&self, record: &MeasurementRecord) -> bool {
        record.is_located() && record.network == self.network
    }
}

/// Sorted distinct network identifiers among located records.
pub fn distinct_networks(records: &[MeasurementRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|record| record.is_located())
        .map(|record| record.network.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MeasurementRecord> {
        vec![
            MeasurementRecord::new(10.0, 20.0, "Zong", None, "Bad"),
            MeasurementRecord::new(11.0, 21.0, "Jazz", Some(-70.0), "Good"),
            MeasurementRecord::new(12.0, 22.0, "Telenor", None, "Great"),
            MeasurementRecord::new(13.0, 23.0, "Jazz", Some(-90.0), "Bad"),
            MeasurementRecord::new(f64::NAN, 23.0, "Jazz", None, "Bad"),
            MeasurementRecord::new(14.0, 24.0, "jazz", None, "Good"),
        ]
    }

    #[test]
    fn network_filter_keeps_order_and_exact_matches() {
        let records = sample();
        let selected = NetworkFilter::new("Jazz").apply(&records);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].latitude, 11.0);
        assert_eq!(selected[1].latitude, 13.0);
        assert!(selected.iter().all(|r| r.network == "Jazz"));
        assert!(selected.len() <= records.len());
    }

    #[test]
    fn unknown_network_yields_empty_selection() {
        let records = sample();
        assert!(NetworkFilter::new("Ufone").apply(&records).is_empty());
    }

    #[test]
    fn distinct_networks_are_sorted_and_unique() {
        let records = sample();
        assert_eq!(
            distinct_networks(&records),
            vec!["Jazz", "Telenor", "Zong", "jazz"]
        );
    }
}
