//! Dispersion-threshold fixation identification (I-DT).
//!
//! Greedy and non-backtracking: a window opens at `i`, grows while both its x
//! and y extents stay below the threshold, then closes for good. The next
//! window opens exactly where the previous one stopped. Windows never overlap
//! and are never re-split.

use crate::core::types::{GazeSeries, LabelSequence};
use crate::error::{require_non_negative, require_positive, FixationError};
use std::ops::Range;

/// Running bounding box of a window.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn at(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn including(self, x: f64, y: f64) -> Self {
        Self {
            min_x: self.min_x.min(x),
            max_x: self.max_x.max(x),
            min_y: self.min_y.min(y),
            max_y: self.max_y.max(y),
        }
    }

    fn within(&self, threshold: f64) -> bool {
        self.max_x - self.min_x < threshold && self.max_y - self.min_y < threshold
    }
}

/// Split the series into consecutive maximal low-dispersion windows.
///
/// Returned ranges are half-open, contiguous, and cover `0..len`.
pub fn dispersion_windows(
    series: &GazeSeries<'_>,
    dispersion_threshold: f64,
) -> Result<Vec<Range<usize>>, FixationError> {
    require_positive("dispersion_threshold", dispersion_threshold)?;

    let x = series.x();
    let y = series.y();
    let n = series.len();
    let mut windows = Vec::new();

    let mut i = 0;
    while i < n {
        let mut extent = Extent::at(x[i], y[i]);
        let mut j = i;
        while j < n {
            let grown = extent.including(x[j], y[j]);
            if !grown.within(dispersion_threshold) {
                break;
            }
            extent = grown;
            j += 1;
        }
        // A single point has zero extent, so j > i whenever the threshold is positive.
        windows.push(i..j);
        i = j;
    }

    Ok(windows)
}

/// Label samples by dispersion threshold.
///
/// Every window from [`dispersion_windows`] whose duration
/// `(j - i) * time_interval` reaches `min_fixation_duration` is labelled
/// fixation in full. Series with fewer than two samples stay all saccade.
pub fn apply_idt(
    series: &GazeSeries<'_>,
    dispersion_threshold: f64,
    min_fixation_duration: f64,
) -> Result<LabelSequence, FixationError> {
    require_non_negative("min_fixation_duration", min_fixation_duration)?;
    let windows = dispersion_windows(series, dispersion_threshold)?;

    let mut labels = LabelSequence::saccades(series.len());
    if series.len() < 2 {
        return Ok(labels);
    }

    for window in windows {
        if series.run_meets_duration(window.len(), min_fixation_duration) {
            labels.mark_fixation(window);
        }
    }

    Ok(labels)
}
