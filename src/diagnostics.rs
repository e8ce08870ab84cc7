//! Report data returned by the conversion driver and written by the tools.
use crate::transform::CornerOffsets;
use serde::{Deserialize, Serialize};

/// Timing entry for a single stage of a conversion run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

/// Aggregated timing trace.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming {
            label: label.into(),
            elapsed_ms,
        });
    }
}

/// Geometry and coverage summary of one scan conversion.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub source_size: Vec<usize>,
    pub output_origin: Vec<f64>,
    pub output_spacing: Vec<f64>,
    pub output_size: Vec<usize>,
    pub radius_axis: usize,
    pub angle_axis: usize,
    pub r_min: f64,
    pub r_max: f64,
    pub line_count: usize,
    pub corners: CornerOffsets,
    /// Output samples interpolated from the sector.
    pub inside_samples: usize,
    /// Output samples that received the default value.
    pub default_samples: usize,
    pub timing: TimingBreakdown,
}

impl ConversionReport {
    /// Share of output samples covered by the sector.
    pub fn coverage(&self) -> f64 {
        let total = self.inside_samples + self.default_samples;
        if total == 0 {
            0.0
        } else {
            self.inside_samples as f64 / total as f64
        }
    }
}
