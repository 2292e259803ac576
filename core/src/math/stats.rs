use crate::prelude::GeoPoint;

pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; `None` for an empty sequence.
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    pub fn centroid<I>(points: I) -> Option<GeoPoint>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let (lat_sum, lon_sum, count) = points
            .into_iter()
            .fold((0.0, 0.0, 0usize), |(lat, lon, count), point| {
                (lat + point.latitude, lon + point.longitude, count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(GeoPoint {
            latitude: lat_sum / count as f64,
            longitude: lon_sum / count as f64,
        })
    }
}
