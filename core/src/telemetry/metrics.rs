use crate::filtering::CoverageSummary;
use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Counters of render passes by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub passes: usize,
    pub averaged: usize,
    pub no_data: usize,
    pub pending: usize,
    pub skipped_rows: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_pass(&self, summary: &CoverageSummary) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.passes += 1;
            match summary {
                CoverageSummary::Pending => metrics.pending += 1,
                CoverageSummary::NoData => metrics.no_data += 1,
                CoverageSummary::Averaged { .. } => metrics.averaged += 1,
            }
        }
    }

    pub fn record_skipped_rows(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.skipped_rows += count;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
