//! Filtering and viewport-aware aggregation core for the coverage map.
//!
//! Records flow through a network filter and a viewport filter before the
//! aggregator maps their mean quality rank back onto the shared quality scale.
//! Everything here is a pure function of (records, network, viewport).

pub mod filtering;
pub mod ingest;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod quality;
pub mod record;
pub mod render;
pub mod telemetry;

pub use pipeline::{CoveragePipeline, CoverageView, RenderRequest};
pub use prelude::{CoverageError, CoverageResult, RecordFilter};
