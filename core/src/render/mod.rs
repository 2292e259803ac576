pub mod legend;
pub mod marker;

pub use legend::{Legend, LegendEntry, UNKNOWN_LABEL};
pub use marker::{MarkerDescriptor, MarkerStyle, Tooltip};
