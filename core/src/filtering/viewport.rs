use crate::prelude::RecordFilter;
use crate::record::{MeasurementRecord, ViewportBound};

impl RecordFilter for ViewportBound {
    fn keep(&self, record: &MeasurementRecord) -> bool {
        record.is_located() && self.contains(record.latitude, record.longitude)
    }
}

/// Outcome of the viewport stage. `Undetermined` means no bound has been
/// reported yet and is never the same as an empty selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportSelection<'a> {
    Undetermined,
    Selected(Vec<&'a MeasurementRecord>),
}

impl<'a> ViewportSelection<'a> {
    pub fn records(&self) -> Option<&[&'a MeasurementRecord]> {
        match self {
            ViewportSelection::Undetermined => None,
            ViewportSelection::Selected(records) => Some(records.as_slice()),
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, ViewportSelection::Selected(_))
    }
}

pub fn select_in_viewport<'a, I>(
    records: I,
    bound: Option<&ViewportBound>,
) -> ViewportSelection<'a>
where
    I: IntoIterator<Item = &'a MeasurementRecord>,
{
    match bound {
        None => ViewportSelection::Undetermined,
        Some(bound) => ViewportSelection::Selected(bound.apply(records)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MeasurementRecord> {
        vec![
            MeasurementRecord::new(10.0, 20.0, "Jazz", None, "Good"),
            MeasurementRecord::new(11.0, 21.0, "Jazz", None, "Great"),
            MeasurementRecord::new(50.0, 60.0, "Zong", None, "Bad"),
        ]
    }

    #[test]
    fn absent_bound_is_undetermined_not_empty() {
        let records = sample();
        let selection = select_in_viewport(&records, None);
        assert_eq!(selection, ViewportSelection::Undetermined);
        assert!(selection.records().is_none());
    }

    #[test]
    fn bound_selects_inclusive_rectangle() {
        let records = sample();
        let bound = ViewportBound::new(10.0, 11.0, 20.0, 21.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        let selected = selection.records().unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected
            .iter()
            .all(|r| bound.contains(r.latitude, r.longitude)));
    }

    #[test]
    fn reapplying_same_bound_is_idempotent() {
        let records = sample();
        let bound = ViewportBound::new(9.0, 12.0, 19.0, 22.0).unwrap();
        let once = bound.apply(&records);
        let twice = bound.apply(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn covering_bound_returns_full_input() {
        let records = sample();
        let bound = ViewportBound::new(10.0, 50.0, 20.0, 60.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        assert_eq!(selection.records().unwrap().len(), records.len());
    }

    #[test]
    fn bound_outside_data_is_empty_but_determined() {
        let records = sample();
        let bound = ViewportBound::new(-10.0, -5.0, 0.0, 5.0).unwrap();
        let selection = select_in_viewport(&records, Some(&bound));
        assert!(selection.is_determined());
        assert!(selection.records().unwrap().is_empty());
    }
}
