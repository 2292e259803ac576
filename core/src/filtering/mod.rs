pub mod aggregate;
pub mod network;
pub mod viewport;

pub use aggregate::{CoverageSummary, QualityAggregator};
pub use network::{distinct_networks, NetworkFilter};
pub use viewport::{select_in_viewport, ViewportSelection};
