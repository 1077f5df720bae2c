//! Job System Module
//!
//! Runs conversions on background tasks and reports back to the foreground
//! through an ordered event channel.

mod worker;

pub use worker::*;

use serde::Serialize;

use crate::conversion::{ConversionRequest, ConversionResult, CONVERTING_STATUS};

/// Unique job identifier (ULID string)
pub type JobId = String;

/// Creates a new job identifier
pub fn new_job_id() -> JobId {
    ulid::Ulid::new().to_string()
}

/// Event sent from a background conversion to the foreground.
///
/// For a single job, `Started` is always delivered before `Finished`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConversionEvent {
    /// The job has been picked up and FFmpeg is about to be launched
    #[serde(rename_all = "camelCase")]
    Started {
        job_id: JobId,
        request: ConversionRequest,
    },
    /// The job reached a terminal outcome
    #[serde(rename_all = "camelCase")]
    Finished {
        job_id: JobId,
        result: ConversionResult,
    },
}

impl ConversionEvent {
    pub fn job_id(&self) -> &str {
        match self {
            ConversionEvent::Started { job_id, .. } | ConversionEvent::Finished { job_id, .. } => {
                job_id
            }
        }
    }

    /// Status line a shell shows after applying this event
    pub fn status_text(&self) -> &'static str {
        match self {
            ConversionEvent::Started { .. } => CONVERTING_STATUS,
            ConversionEvent::Finished { result, .. } => result.status_text(),
        }
    }

    /// Whether this is the last event for its job
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionEvent::Finished { .. })
    }
}
