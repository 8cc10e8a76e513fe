//! End-to-end fixation classification.
//!
//! ```text
//!  (x, y) ──┬──▶ apply_ivt ──┐
//!           │                ├──▶ combine_labels ──▶ extract_events ──▶ FixationResult
//!           └──▶ apply_idt ──┘
//! ```

use crate::core::combine::{combine_labels, Mode};
use crate::core::dispersion::apply_idt;
use crate::core::events::{extract_events, FixationEvent};
use crate::core::types::{GazeSeries, LabelSequence};
use crate::core::velocity::apply_ivt;
use crate::error::{require_non_negative, require_positive, FixationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default I-VT threshold in pixels per second.
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 1000.0;

/// Default I-DT threshold in pixels.
pub const DEFAULT_DISPERSION_THRESHOLD: f64 = 25.0;

/// Default minimum fixation duration in seconds.
pub const DEFAULT_MIN_FIXATION_DURATION: f64 = 0.1;

/// Parameter ranges offered by the dashboard sliders: (min, max, step).
///
/// Advisory only. Any value that passes [`FixationParams::validate`] is accepted.
pub mod ranges {
    pub const VELOCITY_THRESHOLD: (f64, f64, f64) = (100.0, 2000.0, 50.0);
    pub const DISPERSION_THRESHOLD: (f64, f64, f64) = (5.0, 100.0, 5.0);
    pub const MIN_FIXATION_DURATION: (f64, f64, f64) = (0.01, 0.5, 0.01);
}

/// Algorithm parameters for [`classify_fixations`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixationParams {
    /// How velocity and dispersion labels are combined
    pub mode: Mode,
    /// I-VT threshold (pixels/second), > 0
    pub velocity_threshold: f64,
    /// I-DT threshold (pixels), > 0
    pub dispersion_threshold: f64,
    /// Shortest run kept as a fixation (seconds), >= 0
    pub min_fixation_duration: f64,
}

impl Default for FixationParams {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            dispersion_threshold: DEFAULT_DISPERSION_THRESHOLD,
            min_fixation_duration: DEFAULT_MIN_FIXATION_DURATION,
        }
    }
}

impl FixationParams {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_velocity_threshold(mut self, velocity_threshold: f64) -> Self {
        self.velocity_threshold = velocity_threshold;
        self
    }

    pub fn with_dispersion_threshold(mut self, dispersion_threshold: f64) -> Self {
        self.dispersion_threshold = dispersion_threshold;
        self
    }

    pub fn with_min_fixation_duration(mut self, min_fixation_duration: f64) -> Self {
        self.min_fixation_duration = min_fixation_duration;
        self
    }

    /// Check every parameter, regardless of which ones `mode` uses.
    pub fn validate(&self) -> Result<(), FixationError> {
        require_positive("velocity_threshold", self.velocity_threshold)?;
        require_positive("dispersion_threshold", self.dispersion_threshold)?;
        require_non_negative("min_fixation_duration", self.min_fixation_duration)?;
        Ok(())
    }
}

/// Output of [`classify_fixations`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixationResult {
    /// Combined per-sample labels
    pub labels: LabelSequence,
    /// Velocity-threshold labels before combination
    pub ivt_labels: LabelSequence,
    /// Dispersion-threshold labels before combination
    pub idt_labels: LabelSequence,
    /// Fixation events in order
    pub events: Vec<FixationEvent>,
    /// Event centroid x values, one per event
    pub avg_x: Vec<f64>,
    /// Event centroid y values, one per event
    pub avg_y: Vec<f64>,
}

impl FixationResult {
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Number of input samples.
    pub fn sample_count(&self) -> usize {
        self.labels.len()
    }
}

/// Classify a gaze series into fixation events.
///
/// Parameters are validated before anything is computed.
pub fn classify_fixations(
    series: &GazeSeries<'_>,
    params: &FixationParams,
) -> Result<FixationResult, FixationError> {
    params.validate()?;

    let ivt_labels = apply_ivt(series, params.velocity_threshold, params.min_fixation_duration)?;
    let idt_labels = apply_idt(
        series,
        params.dispersion_threshold,
        params.min_fixation_duration,
    )?;
    let labels = combine_labels(&ivt_labels, &idt_labels, params.mode)?;
    let extracted = extract_events(&labels, series.x(), series.y())?;

    debug!(
        samples = series.len(),
        mode = %params.mode,
        ivt_fixation_samples = ivt_labels.fixation_count(),
        idt_fixation_samples = idt_labels.fixation_count(),
        events = extracted.events.len(),
        "classified gaze series"
    );

    Ok(FixationResult {
        labels,
        ivt_labels,
        idt_labels,
        events: extracted.events,
        avg_x: extracted.avg_x,
        avg_y: extracted.avg_y,
    })
}

/// Convenience wrapper taking raw slices and an interval.
pub fn classify_xy(
    x: &[f64],
    y: &[f64],
    time_interval: f64,
    params: &FixationParams,
) -> Result<FixationResult, FixationError> {
    let series = GazeSeries::new(x, y, time_interval)?;
    classify_fixations(&series, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP_X: [f64; 6] = [0.0, 0.0, 0.0, 50.0, 50.0, 50.0];
    const FLAT_Y: [f64; 6] = [0.0; 6];

    #[test]
    fn test_default_params() {
        let params = FixationParams::default();
        assert_eq!(params.mode, Mode::And);
        assert_eq!(params.velocity_threshold, 1000.0);
        assert_eq!(params.dispersion_threshold, 25.0);
        assert_eq!(params.min_fixation_duration, 0.1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_dispersion_only_step() {
        let params = FixationParams::default()
            .with_mode(Mode::DtOnly)
            .with_dispersion_threshold(10.0);
        let result = classify_xy(&STEP_X, &FLAT_Y, 0.1, &params).unwrap();

        assert_eq!(result.event_count(), 2);
        assert_eq!(result.events[0].range(), 0..3);
        assert_eq!((result.events[0].centroid_x, result.events[0].centroid_y), (0.0, 0.0));
        assert_eq!(result.events[1].range(), 3..6);
        assert_eq!((result.events[1].centroid_x, result.events[1].centroid_y), (50.0, 0.0));
        assert_eq!(result.avg_x, vec![0.0, 50.0]);
        assert_eq!(result.avg_y, vec![0.0, 0.0]);
    }

    #[test]
    fn test_velocity_only_threshold_sensitivity() {
        let params = FixationParams::default().with_mode(Mode::VtOnly);

        let high = classify_xy(&STEP_X, &FLAT_Y, 0.1, &params.with_velocity_threshold(1000.0))
            .unwrap();
        assert_eq!(high.event_count(), 1);
        assert_eq!(high.events[0].range(), 1..6);

        let low =
            classify_xy(&STEP_X, &FLAT_Y, 0.1, &params.with_velocity_threshold(100.0)).unwrap();
        assert_eq!(low.event_count(), 2);
        assert_eq!(low.events[0].range(), 1..3);
        assert_eq!(low.events[1].range(), 4..6);
    }

    #[test]
    fn test_invalid_params_rejected_before_work() {
        let bad = FixationParams::default().with_dispersion_threshold(-1.0);
        let err = classify_xy(&STEP_X, &FLAT_Y, 0.1, &bad).unwrap_err();
        assert!(matches!(
            err,
            FixationError::InvalidParameter {
                name: "dispersion_threshold",
                ..
            }
        ));

        let bad = FixationParams::default().with_min_fixation_duration(-0.5);
        assert!(classify_xy(&STEP_X, &FLAT_Y, 0.1, &bad).is_err());

        assert!(classify_xy(&STEP_X, &FLAT_Y, 0.0, &FixationParams::default()).is_err());
    }

    #[test]
    fn test_boundary_sizes() {
        let params = FixationParams::default();

        let empty = classify_xy(&[], &[], 0.1, &params).unwrap();
        assert!(empty.labels.is_empty());
        assert!(empty.events.is_empty());

        let single = classify_xy(&[3.0], &[4.0], 0.1, &params.with_min_fixation_duration(0.0))
            .unwrap();
        assert_eq!(single.labels.codes(), vec![0]);
        assert!(single.events.is_empty());
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: FixationParams =
            serde_json::from_str(r#"{"mode": "dt_only", "dispersion_threshold": 40}"#).unwrap();
        assert_eq!(params.mode, Mode::DtOnly);
        assert_eq!(params.dispersion_threshold, 40.0);
        assert_eq!(params.velocity_threshold, DEFAULT_VELOCITY_THRESHOLD);
    }
}
