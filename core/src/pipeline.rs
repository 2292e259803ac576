use crate::filtering::{select_in_viewport, CoverageSummary, NetworkFilter, QualityAggregator};
use crate::math::stats::StatsHelper;
use crate::prelude::{GeoPoint, RecordFilter, RenderConfig};
use crate::quality::QualityScale;
use crate::record::{MeasurementRecord, ViewportBound};
use crate::render::{Legend, MarkerDescriptor, MarkerStyle};
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Session inputs for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest<'a> {
    pub network: &'a str,
    pub viewport: Option<ViewportBound>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub position: GeoPoint,
    pub zoom: u8,
    /// Set when the selection was empty and the configured location was used.
    pub fallback: bool,
}

/// Everything the map presenter needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageView {
    pub network: String,
    pub center: MapCenter,
    pub markers: Vec<MarkerDescriptor>,
    pub viewport: Option<ViewportBound>,
    pub legend: Legend,
}

impl CoverageView {
    pub fn summary(&self) -> &CoverageSummary {
        &self.legend.summary
    }
}

/// Record snapshot → network filter → viewport filter → aggregation.
pub struct CoveragePipeline {
    scale: QualityScale,
    config: RenderConfig,
    logger: LogManager,
}

impl CoveragePipeline {
    pub fn new(scale: QualityScale, config: RenderConfig) -> Self {
        Self {
            scale,
            config,
            logger: LogManager::new("coveragecore::pipeline"),
        }
    }

    pub fn render(&self, records: &[MeasurementRecord], request: &RenderRequest<'_>) -> CoverageView {
        let selected = NetworkFilter::new(request.network).apply(records);
        let style = MarkerStyle {
            radius: self.config.marker_radius,
            fill_opacity: self.config.fill_opacity,
        };
        let markers: Vec<MarkerDescriptor> = selected
            .iter()
            .filter_map(|record| MarkerDescriptor::from_record(record, &self.scale, style))
            .collect();

        let center = match StatsHelper::centroid(markers.iter().map(|marker| marker.position)) {
            Some(position) => MapCenter {
                position,
                zoom: self.config.zoom,
                fallback: false,
            },
            None => {
                self.logger.warn(&format!(
                    "network {:?} has no records, centering on fallback",
                    request.network
                ));
                MapCenter {
                    position: self.config.fallback_center,
                    zoom: self.config.zoom,
                    fallback: true,
                }
            }
        };

        let in_view = select_in_viewport(selected.iter().copied(), request.viewport.as_ref());
        let summary = QualityAggregator::new(&self.scale).aggregate(&in_view);
        self.logger.detail(&format!(
            "network {:?}: {} markers, {}",
            request.network,
            markers.len(),
            summary.label()
        ));

        CoverageView {
            network: request.network.to_string(),
            center,
            markers,
            viewport: request.viewport,
            legend: Legend::new(request.network, &self.scale, summary),
        }
    }
}

impl Default for CoveragePipeline {
    fn default() -> Self {
        Self::new(QualityScale::standard(), RenderConfig::default())
    }
}
