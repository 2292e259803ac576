pub mod measurement;
pub mod viewport;

pub use measurement::MeasurementRecord;
pub use viewport::ViewportBound;
