//! Fixation event extraction.
//!
//! Consecutive fixation labels are grouped into events, and each event is
//! summarised by the centroid of its samples. The centroids in event order
//! form the reduced scanpath (`avg_x`, `avg_y`).

use crate::core::types::{GazeSample, GazeSeries, LabelSequence};
use crate::error::FixationError;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::ops::Range;

/// A contiguous run of fixation samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixationEvent {
    /// First sample index (inclusive)
    pub start: usize,
    /// One past the last sample index
    pub end: usize,
    /// Mean x over the run
    pub centroid_x: f64,
    /// Mean y over the run
    pub centroid_y: f64,
}

impl FixationEvent {
    /// Number of samples in the event.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Event duration in seconds.
    pub fn duration_secs(&self, time_interval: f64) -> f64 {
        self.len() as f64 * time_interval
    }

    /// Onset time in seconds from the start of the series.
    pub fn onset_secs(&self, time_interval: f64) -> f64 {
        self.start as f64 * time_interval
    }

    /// The raw samples that make up this event.
    pub fn samples<'a>(&self, series: &GazeSeries<'a>) -> impl Iterator<Item = GazeSample> + 'a {
        series.samples().skip(self.start).take(self.len())
    }
}

/// Extracted events plus the reduced scanpath.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEvents {
    pub events: Vec<FixationEvent>,
    /// Centroid x per event, in event order
    pub avg_x: Vec<f64>,
    /// Centroid y per event, in event order
    pub avg_y: Vec<f64>,
}

/// Group fixation labels into events.
///
/// Scans left to right. A run closes at a saccade, at a recorded boundary, or
/// at the end of the series; a trailing run is emitted exactly like any other.
pub fn extract_events(
    labels: &LabelSequence,
    x: &[f64],
    y: &[f64],
) -> Result<ExtractedEvents, FixationError> {
    if x.len() != y.len() {
        return Err(FixationError::length_mismatch("x", x.len(), "y", y.len()));
    }
    if labels.len() != x.len() {
        return Err(FixationError::length_mismatch(
            "labels",
            labels.len(),
            "x",
            x.len(),
        ));
    }

    let runs = labels.fixation_runs();
    let mut extracted = ExtractedEvents {
        events: Vec::with_capacity(runs.len()),
        avg_x: Vec::with_capacity(runs.len()),
        avg_y: Vec::with_capacity(runs.len()),
    };

    for run in runs {
        let centroid_x = x[run.clone()].iter().mean();
        let centroid_y = y[run.clone()].iter().mean();

        extracted.events.push(FixationEvent {
            start: run.start,
            end: run.end,
            centroid_x,
            centroid_y,
        });
        extracted.avg_x.push(centroid_x);
        extracted.avg_y.push(centroid_y);
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Label;

    fn labels(codes: &[u8]) -> LabelSequence {
        codes
            .iter()
            .map(|&c| if c == 1 { Label::Fixation } else { Label::Saccade })
            .collect()
    }

    #[test]
    fn test_mid_and_trailing_runs() {
        let x = [1.0, 2.0, 3.0, 10.0, 20.0, 30.0];
        let y = [0.0, 0.0, 6.0, 5.0, 5.0, 5.0];

        let out = extract_events(&labels(&[1, 1, 1, 0, 1, 1]), &x, &y).unwrap();

        assert_eq!(out.events.len(), 2);
        assert_eq!(out.events[0].range(), 0..3);
        assert!((out.events[0].centroid_x - 2.0).abs() < 1e-12);
        assert!((out.events[0].centroid_y - 2.0).abs() < 1e-12);

        // Trailing run is closed at the end of the series.
        assert_eq!(out.events[1].range(), 4..6);
        assert!((out.events[1].centroid_x - 25.0).abs() < 1e-12);
        assert_eq!(out.avg_x, vec![out.events[0].centroid_x, 25.0]);
        assert_eq!(out.avg_y, vec![out.events[0].centroid_y, 5.0]);
    }

    #[test]
    fn test_no_fixations() {
        let out = extract_events(&labels(&[0, 0, 0]), &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(out.events.is_empty());
        assert!(out.avg_x.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let out = extract_events(&LabelSequence::default(), &[], &[]).unwrap();
        assert_eq!(out, ExtractedEvents::default());
    }

    #[test]
    fn test_single_sample_event() {
        let out = extract_events(&labels(&[0, 1, 0]), &[0.0, 7.0, 0.0], &[0.0, -3.0, 0.0]).unwrap();
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].len(), 1);
        assert_eq!(out.avg_x, vec![7.0]);
        assert_eq!(out.avg_y, vec![-3.0]);
    }

    #[test]
    fn test_length_mismatch() {
        let err = extract_events(&labels(&[1, 1]), &[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, FixationError::LengthMismatch { left: 2, right: 3, .. }));

        assert!(extract_events(&labels(&[1]), &[0.0], &[]).is_err());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let seq = labels(&[0, 1, 1, 0, 1]);
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [4.0, 3.0, 2.0, 1.0, 0.0];

        let first = extract_events(&seq, &x, &y).unwrap();
        let second = extract_events(&seq, &x, &y).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_event_timing() {
        let event = FixationEvent {
            start: 10,
            end: 35,
            centroid_x: 0.0,
            centroid_y: 0.0,
        };
        assert_eq!(event.len(), 25);
        assert!((event.duration_secs(0.004) - 0.1).abs() < 1e-12);
        assert!((event.onset_secs(0.004) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_event_is_empty() {
        let event = FixationEvent {
            start: 8,
            end: 3,
            centroid_x: 0.0,
            centroid_y: 0.0,
        };
        assert_eq!(event.len(), 0);
        assert!(event.is_empty());
        assert_eq!(event.duration_secs(0.1), 0.0);
    }
}
