//! Per-subject batch classification.
//!
//! Each subject's recording is classified independently on a small pool of
//! scoped worker threads. Jobs and results travel over crossbeam channels, and
//! results are reassembled in input order so the outcome is deterministic.

use crate::core::classify::{classify_fixations, FixationParams};
use crate::core::events::FixationEvent;
use crate::core::summary::ScanpathSummary;
use crate::core::types::GazeRecording;
use crate::error::{require_positive, FixationError};
use crossbeam_channel::unbounded;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::thread;
use tracing::{debug, warn};

/// Options shared by every subject in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    pub params: FixationParams,
    /// Seconds between samples, shared by the whole dataset
    pub time_interval: f64,
    /// When false, raw scanpaths are passed through without classification
    pub compute_fixations: bool,
    /// Worker thread count; 0 picks the available parallelism
    pub workers: usize,
}

impl BatchOptions {
    pub fn new(params: FixationParams, time_interval: f64) -> Self {
        Self {
            params,
            time_interval,
            compute_fixations: true,
            workers: 0,
        }
    }

    pub fn with_compute_fixations(mut self, compute_fixations: bool) -> Self {
        self.compute_fixations = compute_fixations;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    fn worker_count(&self, jobs: usize) -> usize {
        let wanted = if self.workers == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            self.workers
        };
        wanted.clamp(1, jobs.max(1))
    }
}

/// The scanpath to draw for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectScanpath {
    pub subject: String,
    /// Fixation centroids, or the raw samples when classification is off
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Empty when classification is off
    pub events: Vec<FixationEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScanpathSummary>,
}

impl SubjectScanpath {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Results of a batch, keyed by subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub scanpaths: BTreeMap<String, SubjectScanpath>,
    pub failures: BTreeMap<String, FixationError>,
}

impl BatchOutcome {
    /// Length of the longest scanpath across subjects.
    pub fn max_scanpath_len(&self) -> usize {
        self.scanpaths.values().map(|s| s.len()).max().unwrap_or(0)
    }
}

/// Name used for a recording without a subject id.
fn subject_name(recording: &GazeRecording, index: usize) -> String {
    recording
        .subject
        .clone()
        .unwrap_or_else(|| format!("subject-{index}"))
}

fn classify_one(
    recording: &GazeRecording,
    name: String,
    options: &BatchOptions,
) -> Result<SubjectScanpath, FixationError> {
    let series = recording.series(options.time_interval)?;

    if !options.compute_fixations {
        return Ok(SubjectScanpath {
            subject: name,
            x: recording.x.clone(),
            y: recording.y.clone(),
            events: Vec::new(),
            summary: None,
        });
    }

    let result = classify_fixations(&series, &options.params)?;
    let summary = ScanpathSummary::from_result(&result, options.time_interval);

    Ok(SubjectScanpath {
        subject: name,
        x: result.avg_x,
        y: result.avg_y,
        events: result.events,
        summary: Some(summary),
    })
}

/// Classify every recording in parallel.
///
/// Shared parameters are validated up front and fail the whole batch. A bad
/// recording only fails its own subject and is reported in
/// [`BatchOutcome::failures`]. If two recordings share a subject name, the
/// later one wins.
pub fn classify_subjects(
    recordings: &[GazeRecording],
    options: &BatchOptions,
) -> Result<BatchOutcome, FixationError> {
    require_positive("time_interval", options.time_interval)?;
    if options.compute_fixations {
        options.params.validate()?;
    }

    let jobs = recordings.len();
    let workers = options.worker_count(jobs);
    debug!(subjects = jobs, workers, "classifying subject batch");

    let (job_tx, job_rx) = unbounded::<usize>();
    let (result_tx, result_rx) = unbounded();

    for index in 0..jobs {
        if job_tx.send(index).is_err() {
            break;
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for index in job_rx.iter() {
                    let recording = &recordings[index];
                    let name = subject_name(recording, index);
                    let result = classify_one(recording, name.clone(), options);
                    if result_tx.send((index, name, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut slots: Vec<Option<(String, Result<SubjectScanpath, FixationError>)>> =
        (0..jobs).map(|_| None).collect();
    for (index, name, result) in result_rx.try_iter() {
        slots[index] = Some((name, result));
    }

    let mut outcome = BatchOutcome::default();
    for (name, result) in slots.into_iter().flatten() {
        match result {
            Ok(scanpath) => {
                outcome.failures.remove(&name);
                outcome.scanpaths.insert(name, scanpath);
            }
            Err(e) => {
                warn!(subject = %name, error = %e, "subject classification failed");
                outcome.scanpaths.remove(&name);
                outcome.failures.insert(name, e);
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::combine::Mode;

    fn step_recording(subject: &str, jump: f64) -> GazeRecording {
        GazeRecording::new(
            subject,
            vec![0.0, 0.0, 0.0, jump, jump, jump],
            vec![0.0; 6],
        )
    }

    fn dt_options() -> BatchOptions {
        let params = FixationParams::default()
            .with_mode(Mode::DtOnly)
            .with_dispersion_threshold(10.0);
        BatchOptions::new(params, 0.1)
    }

    #[test]
    fn test_batch_classifies_each_subject() {
        let recordings = vec![
            step_recording("s01", 50.0),
            step_recording("s02", 5.0),
            step_recording("s03", 80.0),
        ];

        let outcome = classify_subjects(&recordings, &dt_options().with_workers(2)).unwrap();

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.scanpaths.len(), 3);
        assert_eq!(outcome.scanpaths["s01"].x, vec![0.0, 50.0]);
        // A 5 px jump stays within one dispersion window.
        assert_eq!(outcome.scanpaths["s02"].events.len(), 1);
        assert_eq!(outcome.max_scanpath_len(), 2);
        assert!(outcome.scanpaths["s03"].summary.is_some());
    }

    #[test]
    fn test_raw_passthrough() {
        let recordings = vec![step_recording("s01", 50.0)];
        let options = dt_options().with_compute_fixations(false);

        let outcome = classify_subjects(&recordings, &options).unwrap();
        let scanpath = &outcome.scanpaths["s01"];

        assert_eq!(scanpath.x, recordings[0].x);
        assert!(scanpath.events.is_empty());
        assert!(scanpath.summary.is_none());
        assert_eq!(outcome.max_scanpath_len(), 6);
    }

    #[test]
    fn test_bad_recording_fails_alone() {
        let recordings = vec![
            step_recording("good", 50.0),
            GazeRecording::new("bad", vec![0.0, 1.0], vec![0.0]),
        ];

        let outcome = classify_subjects(&recordings, &dt_options()).unwrap();
        assert!(outcome.scanpaths.contains_key("good"));
        assert!(matches!(
            outcome.failures["bad"],
            FixationError::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_invalid_shared_params_fail_batch() {
        let recordings = vec![step_recording("s01", 50.0)];
        let mut options = dt_options();
        options.time_interval = 0.0;
        assert!(classify_subjects(&recordings, &options).is_err());

        let options = BatchOptions::new(FixationParams::default().with_velocity_threshold(0.0), 0.1);
        assert!(classify_subjects(&recordings, &options).is_err());
    }

    #[test]
    fn test_unnamed_and_empty_batch() {
        let outcome = classify_subjects(&[], &dt_options()).unwrap();
        assert!(outcome.scanpaths.is_empty());
        assert_eq!(outcome.max_scanpath_len(), 0);

        let unnamed = GazeRecording {
            subject: None,
            x: vec![1.0, 1.0],
            y: vec![1.0, 1.0],
        };
        let outcome = classify_subjects(&[unnamed], &dt_options()).unwrap();
        assert!(outcome.scanpaths.contains_key("subject-0"));
    }
}
