//! Serializable fixation reports.
//!
//! A report bundles one classification with the parameters that produced it and
//! producer metadata, so exported JSON is self-describing.

use crate::core::classify::{FixationParams, FixationResult};
use crate::core::events::FixationEvent;
use crate::core::summary::ScanpathSummary;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Report schema version.
pub const REPORT_VERSION: &str = "1.0";

/// The name of this producer.
pub const PRODUCER_NAME: &str = "gaze-fixation";

/// Producer metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    /// Unique instance identifier (UUID)
    pub instance_id: String,
}

/// Parameters echoed into the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportParameters {
    #[serde(flatten)]
    pub params: FixationParams,
    /// Seconds between samples
    pub time_interval: f64,
    /// `1 / time_interval`
    pub sample_rate_hz: f64,
}

/// A single exported classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixationReport {
    /// Report schema version
    pub report_version: String,
    /// When this payload was computed (RFC3339)
    pub computed_at_utc: String,
    pub producer: ReportProducer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub parameters: ReportParameters,
    /// Number of input samples
    pub sample_count: usize,
    pub events: Vec<FixationEvent>,
    pub avg_x: Vec<f64>,
    pub avg_y: Vec<f64>,
    pub summary: ScanpathSummary,
}

/// Builds reports that share one producer instance id.
pub struct ReportBuilder {
    instance_id: Uuid,
}

impl ReportBuilder {
    /// Create a builder with a fresh instance id.
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Build a report for `result`, classified with `params` at `time_interval`.
    pub fn build(
        &self,
        subject: Option<&str>,
        result: &FixationResult,
        params: &FixationParams,
        time_interval: f64,
    ) -> FixationReport {
        FixationReport {
            report_version: REPORT_VERSION.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: crate::VERSION.to_string(),
                instance_id: self.instance_id.to_string(),
            },
            subject: subject.map(str::to_string),
            parameters: ReportParameters {
                params: *params,
                time_interval,
                sample_rate_hz: 1.0 / time_interval,
            },
            sample_count: result.sample_count(),
            events: result.events.clone(),
            avg_x: result.avg_x.clone(),
            avg_y: result.avg_y.clone(),
            summary: ScanpathSummary::from_result(result, time_interval),
        }
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
