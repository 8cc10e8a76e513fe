//! Gaze Fixation - fixation detection for eye-tracking research datasets.
//!
//! This library turns a uniformly sampled 2D gaze trace into discrete
//! fixation events, the periods where the eye is relatively still, as opposed
//! to saccades between them.
//!
//! # Algorithms
//!
//! - **I-VT**: samples reached by a slow enough point-to-point step are fixation
//! - **I-DT**: greedy windows whose x and y extents stay under a threshold
//! - **Combination**: AND, OR, I-VT only or I-DT only
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Gaze Fixation                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐                           │
//! │  │    I-VT     │──▶│             │   ┌─────────────┐         │
//! │  │ (velocity)  │   │   Combine   │──▶│   Events    │         │
//! │  ├─────────────┤   │ (AND/OR/..) │   │ (centroids) │         │
//! │  │    I-DT     │──▶│             │   └─────────────┘         │
//! │  │(dispersion) │   └─────────────┘          │                │
//! │  └─────────────┘                            ▼                │
//! │                                     ┌─────────────┐          │
//! │                                     │ Summary and │          │
//! │                                     │   Report    │          │
//! │                                     └─────────────┘          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core is pure and synchronous: no I/O, no shared state. Independent
//! recordings can be classified in parallel with [`core::classify_subjects`].
//!
//! # Example
//!
//! ```
//! use gaze_fixation::{classify_fixations, FixationParams, GazeSeries, Mode};
//!
//! let x = [0.0, 0.0, 0.0, 50.0, 50.0, 50.0];
//! let y = [0.0; 6];
//! let series = GazeSeries::new(&x, &y, 0.1).unwrap();
//!
//! let params = FixationParams::default()
//!     .with_mode(Mode::DtOnly)
//!     .with_dispersion_threshold(10.0);
//! let result = classify_fixations(&series, &params).unwrap();
//!
//! assert_eq!(result.avg_x, vec![0.0, 50.0]);
//! ```

pub mod config;
pub mod core;
pub mod error;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, DatasetCatalog, DatasetEntry};
pub use core::{
    classify_fixations, classify_subjects, classify_xy, combine_labels, crop_regions,
    extract_events, BatchOptions, BatchOutcome, CropRegion, FixationEvent, FixationParams,
    FixationReport, FixationResult, GazeRecording, GazeSeries, Label, LabelSequence, Mode,
    ReportBuilder, ScanpathSummary,
};
pub use error::FixationError;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
