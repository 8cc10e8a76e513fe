//! Velocity-threshold fixation identification (I-VT).
//!
//! Each step between consecutive samples gets a point-to-point speed. A step
//! slower than the threshold labels its *later* endpoint, so sample 0 is never
//! labelled directly. Runs of slow steps that last long enough become
//! fixations.

use crate::core::types::{GazeSeries, LabelSequence};
use crate::error::{require_non_negative, require_positive, FixationError};
use std::ops::Range;

/// Point-to-point speeds in pixels per second.
///
/// Entry `k` is the speed of the step from sample `k` to sample `k + 1`, so
/// the result has `len - 1` entries (none for fewer than two samples).
pub fn point_velocities(series: &GazeSeries<'_>) -> Vec<f64> {
    let x = series.x();
    let y = series.y();
    let time_interval = series.time_interval();

    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| {
            let dx = xs[1] - xs[0];
            let dy = ys[1] - ys[0];
            (dx * dx + dy * dy).sqrt() / time_interval
        })
        .collect()
}

/// Label samples by velocity threshold.
///
/// A run of consecutive steps with speed below `velocity_threshold` is closed
/// by the first step at or above it, or by the end of the series. It is kept as
/// a fixation if `run_steps * time_interval >= min_fixation_duration`.
pub fn apply_ivt(
    series: &GazeSeries<'_>,
    velocity_threshold: f64,
    min_fixation_duration: f64,
) -> Result<LabelSequence, FixationError> {
    require_positive("velocity_threshold", velocity_threshold)?;
    require_non_negative("min_fixation_duration", min_fixation_duration)?;

    let n = series.len();
    let mut labels = LabelSequence::saccades(n);
    if n < 2 {
        return Ok(labels);
    }

    let velocities = point_velocities(series);
    let mut run_start: Option<usize> = None;

    for (step, &velocity) in velocities.iter().enumerate() {
        // Step k ends at sample k + 1.
        let index = step + 1;
        if velocity < velocity_threshold {
            run_start.get_or_insert(index);
        } else if let Some(start) = run_start.take() {
            close_run(&mut labels, series, start..index, min_fixation_duration);
        }
    }

    if let Some(start) = run_start {
        close_run(&mut labels, series, start..n, min_fixation_duration);
    }

    Ok(labels)
}

fn close_run(
    labels: &mut LabelSequence,
    series: &GazeSeries<'_>,
    run: Range<usize>,
    min_fixation_duration: f64,
) {
    if series.run_meets_duration(run.len(), min_fixation_duration) {
        labels.mark_fixation(run);
    }
}
