use crate::filtering::CoverageSummary;
use crate::quality::{QualityScale, Rgb, FALLBACK_COLOR};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

/// Legend payload: selected network, color key and the current summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub network: String,
    pub entries: Vec<LegendEntry>,
    pub summary: CoverageSummary,
    pub summary_label: String,
}

impl Legend {
    pub fn new(network: &str, scale: &QualityScale, summary: CoverageSummary) -> Self {
        let mut entries: Vec<LegendEntry> = scale
            .levels()
            .iter()
            .map(|level| LegendEntry {
                label: level.name.clone(),
                color: level.color,
            })
            .collect();
        entries.push(LegendEntry {
            label: UNKNOWN_LABEL.to_string(),
            color: FALLBACK_COLOR,
        });

        Self {
            network: network.to_string(),
            entries,
            summary_label: summary.label(),
            summary,
        }
    }
}
