//! Summary statistics over a classified scanpath.

use crate::core::classify::FixationResult;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Aggregate fixation statistics for one recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanpathSummary {
    /// Number of fixation events
    pub fixation_count: usize,
    /// Number of gaps (saccade samples) between consecutive fixations
    pub saccade_count: usize,
    /// Sum of fixation durations in seconds
    pub total_fixation_secs: f64,
    /// Mean fixation duration in seconds
    pub mean_fixation_secs: f64,
    /// Sample standard deviation of fixation durations
    pub fixation_duration_sd: f64,
    /// Share of samples labelled fixation (0-1)
    pub fixation_ratio: f64,
    /// Path length through consecutive centroids, in pixels
    pub scanpath_length_px: f64,
}

impl ScanpathSummary {
    /// Compute the summary for a result produced at `time_interval`.
    pub fn from_result(result: &FixationResult, time_interval: f64) -> Self {
        let durations: Vec<f64> = result
            .events
            .iter()
            .map(|e| e.duration_secs(time_interval))
            .collect();

        let fixation_count = durations.len();
        // Adjacent windows split at a boundary have no saccade between them.
        let saccade_count = result
            .events
            .windows(2)
            .filter(|pair| pair[0].end < pair[1].start)
            .count();
        let total_fixation_secs = durations.iter().sum::<f64>();
        let mean_fixation_secs = if durations.is_empty() {
            0.0
        } else {
            durations.iter().mean()
        };
        let fixation_duration_sd = if durations.len() < 2 {
            0.0
        } else {
            durations.iter().std_dev()
        };

        let fixation_ratio = if result.labels.is_empty() {
            0.0
        } else {
            result.labels.fixation_count() as f64 / result.labels.len() as f64
        };

        let scanpath_length_px = result
            .avg_x
            .windows(2)
            .zip(result.avg_y.windows(2))
            .map(|(xs, ys)| ((xs[1] - xs[0]).powi(2) + (ys[1] - ys[0]).powi(2)).sqrt())
            .sum();

        Self {
            fixation_count,
            saccade_count,
            total_fixation_secs,
            mean_fixation_secs,
            fixation_duration_sd,
            fixation_ratio,
            scanpath_length_px,
        }
    }
}
