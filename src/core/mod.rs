//! Fixation classification core.
//!
//! This module contains:
//! - Gaze series and label types
//! - Velocity (I-VT) and dispersion (I-DT) segmenters
//! - Label combination and fixation event extraction
//! - Summaries, crop geometry, reports and per-subject batching built on top

pub mod batch;
pub mod classify;
pub mod combine;
pub mod crops;
pub mod dispersion;
pub mod events;
pub mod report;
pub mod summary;
pub mod types;
pub mod velocity;

// Re-export commonly used types
pub use batch::{classify_subjects, BatchOptions, BatchOutcome, SubjectScanpath};
pub use classify::{classify_fixations, classify_xy, FixationParams, FixationResult};
pub use combine::{combine_labels, Mode};
pub use crops::{crop_regions, CropRegion};
pub use dispersion::{apply_idt, dispersion_windows};
pub use events::{extract_events, ExtractedEvents, FixationEvent};
pub use report::{FixationReport, ReportBuilder, PRODUCER_NAME, REPORT_VERSION};
pub use summary::ScanpathSummary;
pub use types::{GazeRecording, GazeSample, GazeSeries, Label, LabelSequence};
pub use velocity::{apply_ivt, point_velocities};
