use crate::prelude::{CoverageError, CoverageResult};
use serde::{Deserialize, Serialize};

/// Rectangle currently visible on the map, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBound")]
pub struct ViewportBound {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

#[derive(Deserialize)]
struct RawBound {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

impl TryFrom<RawBound> for ViewportBound {
    type Error = CoverageError;

    fn try_from(raw: RawBound) -> CoverageResult<Self> {
        ViewportBound::new(raw.south, raw.north, raw.west, raw.east)
    }
}

impl ViewportBound {
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> CoverageResult<Self> {
        if ![south, north, west, east].iter().all(|v| v.is_finite()) {
            return Err(CoverageError::InvalidViewport(
                "bounds must be finite".into(),
            ));
        }
        if south > north {
            return Err(CoverageError::InvalidViewport(format!(
                "south {} above north {}",
                south, north
            )));
        }
        if west > east {
            return Err(CoverageError::InvalidViewport(format!(
                "west {} beyond east {}",
                west, east
            )));
        }
        Ok(Self {
            south,
            north,
            west,
            east,
        })
    }

    /// Inclusive containment test.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.south <= latitude
            && latitude <= self.north
            && self.west <= longitude
            && longitude <= self.east
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

impl std::str::FromStr for ViewportBound {
    type Err = CoverageError;

    /// Parses `south,north,west,east`.
    fn from_str(value: &str) -> CoverageResult<Self> {
        let parts = value
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|_| {
                    CoverageError::InvalidViewport(format!("not a number: {:?}", part.trim()))
                })
            })
            .collect::<CoverageResult<Vec<f64>>>()?;
        match parts.as_slice() {
            [south, north, west, east] => ViewportBound::new(*south, *north, *west, *east),
            _ => Err(CoverageError::InvalidViewport(format!(
                "expected 4 values, got {}",
                parts.len()
            ))),
        }
    }
}
