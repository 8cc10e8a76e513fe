//! Gaze series and per-sample label types.
//!
//! A [`GazeSeries`] borrows the caller's coordinate buffers; nothing in the
//! core keeps a reference to them after a call returns.

use crate::error::{require_positive, FixationError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A single gaze position with its index and implicit timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    /// Index into the series
    pub index: usize,
    /// Horizontal position in pixels
    pub x: f64,
    /// Vertical position in pixels
    pub y: f64,
    /// `index * time_interval`, in seconds
    pub timestamp: f64,
}

/// A uniformly sampled 2D gaze trace.
///
/// Invariants, checked by [`GazeSeries::new`]:
/// - `x` and `y` have the same length
/// - `time_interval` is finite and greater than zero
/// - every coordinate is finite
#[derive(Debug, Clone, Copy)]
pub struct GazeSeries<'a> {
    x: &'a [f64],
    y: &'a [f64],
    time_interval: f64,
}

impl<'a> GazeSeries<'a> {
    /// Validate and wrap a pair of coordinate slices.
    pub fn new(x: &'a [f64], y: &'a [f64], time_interval: f64) -> Result<Self, FixationError> {
        if x.len() != y.len() {
            return Err(FixationError::length_mismatch("x", x.len(), "y", y.len()));
        }
        require_positive("time_interval", time_interval)?;

        if let Some(index) = x.iter().position(|v| !v.is_finite()) {
            return Err(FixationError::NonFiniteSample { axis: "x", index });
        }
        if let Some(index) = y.iter().position(|v| !v.is_finite()) {
            return Err(FixationError::NonFiniteSample { axis: "y", index });
        }

        Ok(Self {
            x,
            y,
            time_interval,
        })
    }

    /// Build a series from a sampling rate in Hz instead of an interval.
    pub fn from_sample_rate(
        x: &'a [f64],
        y: &'a [f64],
        sample_rate_hz: f64,
    ) -> Result<Self, FixationError> {
        let rate = require_positive("sample_rate", sample_rate_hz)?;
        Self::new(x, y, 1.0 / rate)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &'a [f64] {
        self.x
    }

    pub fn y(&self) -> &'a [f64] {
        self.y
    }

    /// Seconds between consecutive samples.
    pub fn time_interval(&self) -> f64 {
        self.time_interval
    }

    /// Whether a run of `run_len` samples lasts at least `min_duration_secs`.
    ///
    /// Exact comparison of `run_len * time_interval` against the minimum.
    pub fn run_meets_duration(&self, run_len: usize, min_duration_secs: f64) -> bool {
        run_len as f64 * self.time_interval >= min_duration_secs
    }

    /// Total covered time, `len * time_interval`.
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 * self.time_interval
    }

    /// Get the sample at `index`, if in range.
    pub fn sample(&self, index: usize) -> Option<GazeSample> {
        if index >= self.len() {
            return None;
        }
        Some(GazeSample {
            index,
            x: self.x[index],
            y: self.y[index],
            timestamp: index as f64 * self.time_interval,
        })
    }

    /// Iterate over all samples in order.
    pub fn samples(&self) -> impl Iterator<Item = GazeSample> + 'a {
        let (x, y) = (self.x, self.y);
        let time_interval = self.time_interval;
        x.iter()
            .zip(y.iter())
            .enumerate()
            .map(move |(index, (&x, &y))| GazeSample {
                index,
                x,
                y,
                timestamp: index as f64 * time_interval,
            })
    }
}

/// An owned recording as handed over by a dataset loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GazeRecording {
    /// Subject identifier, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Horizontal positions in pixels
    pub x: Vec<f64>,
    /// Vertical positions in pixels
    pub y: Vec<f64>,
}

impl GazeRecording {
    pub fn new(subject: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            subject: Some(subject.into()),
            x,
            y,
        }
    }

    /// Borrow this recording as a validated series.
    pub fn series(&self, time_interval: f64) -> Result<GazeSeries<'_>, FixationError> {
        GazeSeries::new(&self.x, &self.y, time_interval)
    }
}

/// Per-sample classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    #[default]
    Saccade,
    Fixation,
}

impl Label {
    pub fn is_fixation(self) -> bool {
        self == Label::Fixation
    }

    /// Numeric code: 0 = saccade, 1 = fixation.
    pub fn code(self) -> u8 {
        match self {
            Label::Saccade => 0,
            Label::Fixation => 1,
        }
    }
}

/// One label per gaze sample.
///
/// Besides the labels, the sequence keeps a sorted list of *boundaries*:
/// indices `i` where samples `i - 1` and `i` are both fixations but belong to
/// different fixations. They arise when two qualifying dispersion windows
/// abut. A sequence built from plain labels has no boundaries, and its
/// fixation runs are then exactly the maximal runs of fixation labels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawLabelSequence")]
pub struct LabelSequence {
    labels: Vec<Label>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    boundaries: Vec<usize>,
}

/// Unchecked wire form of [`LabelSequence`].
#[derive(Deserialize)]
struct RawLabelSequence {
    labels: Vec<Label>,
    #[serde(default)]
    boundaries: Vec<usize>,
}

impl TryFrom<RawLabelSequence> for LabelSequence {
    type Error = FixationError;

    /// Boundaries must be strictly increasing and each must sit between two
    /// fixation samples.
    fn try_from(raw: RawLabelSequence) -> Result<Self, Self::Error> {
        let mut previous = 0;
        for &index in &raw.boundaries {
            if index <= previous {
                return Err(FixationError::InvalidBoundary {
                    index,
                    reason: "boundaries must be increasing and greater than zero",
                });
            }
            if index >= raw.labels.len() {
                return Err(FixationError::InvalidBoundary {
                    index,
                    reason: "out of range",
                });
            }
            if !(raw.labels[index - 1].is_fixation() && raw.labels[index].is_fixation()) {
                return Err(FixationError::InvalidBoundary {
                    index,
                    reason: "not between two fixation samples",
                });
            }
            previous = index;
        }

        Ok(Self {
            labels: raw.labels,
            boundaries: raw.boundaries,
        })
    }
}

impl LabelSequence {
    /// A sequence of `len` saccade labels.
    pub fn saccades(len: usize) -> Self {
        Self {
            labels: vec![Label::Saccade; len],
            boundaries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels.iter().copied()
    }

    /// Indices where one fixation ends and the next begins with no saccade between.
    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        self.boundaries.binary_search(&index).is_ok()
    }

    /// True if samples `index - 1` and `index` are in the same fixation run.
    pub fn continues_at(&self, index: usize) -> bool {
        index > 0
            && index < self.labels.len()
            && self.labels[index - 1].is_fixation()
            && self.labels[index].is_fixation()
            && !self.is_boundary(index)
    }

    /// Number of samples labelled fixation.
    pub fn fixation_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_fixation()).count()
    }

    /// Fixation runs as half-open ranges, split at saccades and boundaries.
    pub fn fixation_runs(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut open: Option<usize> = None;

        for (i, label) in self.labels.iter().enumerate() {
            if !label.is_fixation() {
                if let Some(start) = open.take() {
                    runs.push(start..i);
                }
                continue;
            }
            match open {
                None => open = Some(i),
                Some(start) if self.is_boundary(i) => {
                    runs.push(start..i);
                    open = Some(i);
                }
                Some(_) => {}
            }
        }
        if let Some(start) = open {
            runs.push(start..self.labels.len());
        }

        runs
    }

    /// True if every fixation here is also a fixation in `other`.
    ///
    /// Only labels are compared. Sequences of different length are never
    /// subsets of each other.
    pub fn is_subset_of(&self, other: &LabelSequence) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| !a.is_fixation() || b.is_fixation())
    }

    /// Numeric codes, 0 = saccade, 1 = fixation.
    pub fn codes(&self) -> Vec<u8> {
        self.labels.iter().map(|l| l.code()).collect()
    }

    /// Label `range` as one fixation run.
    ///
    /// Ranges must be marked in increasing order. If the run directly follows
    /// an earlier one, a boundary is recorded at `range.start`.
    pub(crate) fn mark_fixation(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        if range.start > 0 && self.labels[range.start - 1].is_fixation() {
            self.boundaries.push(range.start);
        }
        for label in &mut self.labels[range] {
            *label = Label::Fixation;
        }
    }

    pub(crate) fn from_parts(labels: Vec<Label>, boundaries: Vec<usize>) -> Self {
        Self { labels, boundaries }
    }
}

impl From<Vec<Label>> for LabelSequence {
    fn from(labels: Vec<Label>) -> Self {
        Self {
            labels,
            boundaries: Vec::new(),
        }
    }
}

impl FromIterator<Label> for LabelSequence {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
