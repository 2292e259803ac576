use crate::store::RecordSnapshot;
use crate::workflow::config::DashboardConfig;
use anyhow::{bail, Context};
use coveragecore::record::ViewportBound;
use coveragecore::telemetry::{MetricsRecorder, MetricsSnapshot};
use coveragecore::{CoveragePipeline, CoverageView, RenderRequest};

/// Runs one complete render pass per session interaction.
pub struct Runner {
    pipeline: CoveragePipeline,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: &DashboardConfig) -> anyhow::Result<Self> {
        let scale = config
            .quality_scale()
            .context("building runner quality scale")?;
        Ok(Self {
            pipeline: CoveragePipeline::new(scale, config.to_render_config()),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn execute(
        &self,
        snapshot: &RecordSnapshot,
        network: &str,
        viewport: Option<ViewportBound>,
    ) -> anyhow::Result<CoverageView> {
        if snapshot.is_empty() {
            bail!("no data available");
        }
        let view = self.pipeline.render(
            &snapshot.records,
            &RenderRequest { network, viewport },
        );
        self.metrics.record_pass(view.summary());
        Ok(view)
    }

    pub fn record_load(&self, snapshot: &RecordSnapshot) {
        self.metrics.record_skipped_rows(snapshot.skipped);
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
