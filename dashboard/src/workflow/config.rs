use anyhow::Context;
use coveragecore::prelude::{GeoPoint, RenderConfig};
use coveragecore::quality::{QualityLevel, QualityScale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/hassan925/Signal-Strength-Dasboard/refs/heads/main/Signal%20Strength%20Data.csv";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// `http(s)://` URL or local path of the measurement CSV.
    pub source: String,
    pub bind: SocketAddr,
    pub fallback_center: GeoPoint,
    pub zoom: u8,
    pub marker_radius: f32,
    pub fill_opacity: f32,
    pub quality_scale: Option<Vec<QualityLevel>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let render = RenderConfig::default();
        Self {
            source: DEFAULT_SOURCE.to_string(),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            fallback_center: render.fallback_center,
            zoom: render.zoom,
            marker_radius: render.marker_radius,
            fill_opacity: render.fill_opacity,
            quality_scale: None,
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_overrides(mut self, source: Option<String>, bind: Option<SocketAddr>) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            fallback_center: self.fallback_center,
            zoom: self.zoom,
            marker_radius: self.marker_radius,
            fill_opacity: self.fill_opacity,
        }
    }

    pub fn quality_scale(&self) -> anyhow::Result<QualityScale> {
        match &self.quality_scale {
            None => Ok(QualityScale::standard()),
            Some(levels) => {
                QualityScale::new(levels.clone()).context("validating configured quality scale")
            }
        }
    }
}
