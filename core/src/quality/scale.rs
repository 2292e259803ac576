//! The one quality scale shared by marker coloring, the legend and aggregation.

use crate::prelude::{CoverageError, CoverageResult};
use crate::quality::color::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Color used for categories the scale does not know.
pub const FALLBACK_COLOR: Rgb = Rgb::new(0x80, 0x80, 0x80);

/// A named quality category with its ordinal rank and display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityLevel {
    pub name: String,
    pub rank: u32,
    pub color: Rgb,
}

impl QualityLevel {
    pub fn new(name: impl Into<String>, rank: u32, color: Rgb) -> Self {
        Self {
            name: name.into(),
            rank,
            color,
        }
    }
}

/// Ordered set of quality levels, sorted by ascending rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScale {
    levels: Vec<QualityLevel>,
}

impl QualityScale {
    /// Validates and sorts a custom scale.
    pub fn new(mut levels: Vec<QualityLevel>) -> CoverageResult<Self> {
        if levels.is_empty() {
            return Err(CoverageError::InvalidScale("scale has no levels".into()));
        }

        let mut names = HashSet::new();
        let mut ranks = HashSet::new();
        for level in &mut levels {
            level.name = level.name.trim().to_string();
            if level.name.is_empty() {
                return Err(CoverageError::InvalidScale("empty level name".into()));
            }
            if !names.insert(level.name.clone()) {
                return Err(CoverageError::InvalidScale(format!(
                    "duplicate level {:?}",
                    level.name
                )));
            }
            if !ranks.insert(level.rank) {
                return Err(CoverageError::InvalidScale(format!(
                    "duplicate rank {}",
                    level.rank
                )));
            }
        }

        levels.sort_by_key(|level| level.rank);
        Ok(Self { levels })
    }

    /// No Coverage < Bad < Moderate < Good < Great.
    pub fn standard() -> Self {
        Self {
            levels: vec![
                QualityLevel::new("No Coverage", 0, Rgb::new(0x00, 0x00, 0x00)),
                QualityLevel::new("Bad", 1, Rgb::new(0xD7, 0x19, 0x1C)),
                QualityLevel::new("Moderate", 2, Rgb::new(0xFD, 0xAE, 0x61)),
                QualityLevel::new("Good", 3, Rgb::new(0xA6, 0xD9, 0x6A)),
                QualityLevel::new("Great", 4, Rgb::new(0x1A, 0x96, 0x41)),
            ],
        }
    }

    pub fn levels(&self) -> &[QualityLevel] {
        &self.levels
    }

    /// Exact, case-sensitive lookup; surrounding whitespace is ignored.
    pub fn level(&self, name: &str) -> Option<&QualityLevel> {
        let name = name.trim();
        self.levels.iter().find(|level| level.name == name)
    }

    pub fn rank(&self, name: &str) -> Option<u32> {
        self.level(name).map(|level| level.rank)
    }

    pub fn color(&self, name: &str) -> Rgb {
        self.level(name)
            .map(|level| level.color)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Level closest to `mean` by rank. Equidistant levels resolve to the lower rank.
    pub fn nearest(&self, mean: f64) -> Option<&QualityLevel> {
        if !mean.is_finite() {
            return None;
        }
        let mut best: Option<(&QualityLevel, f64)> = None;
        for level in &self.levels {
            let distance = (level.rank as f64 - mean).abs();
            match best {
                // levels are rank-ascending, so strict comparison keeps the lower rank on ties
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((level, distance)),
            }
        }
        best.map(|(level, _)| level)
    }
}

impl Default for QualityScale {
    fn default() -> Self {
        Self::standard()
    }
}
