//! Conversion outcomes and the user-facing texts that go with them.

use std::path::PathBuf;

use serde::Serialize;

use crate::ffmpeg::FFmpegError;

/// Status shown before anything has been selected or run
pub const READY_STATUS: &str = "Ready.";

/// Status shown while a conversion is in flight
pub const CONVERTING_STATUS: &str = "Converting... please wait.";

/// Outcome of a single conversion attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConversionResult {
    /// FFmpeg exited with status 0
    #[serde(rename_all = "camelCase")]
    Success { output_path: PathBuf },
    /// FFmpeg could not be located or launched
    ToolNotFound,
    /// FFmpeg ran and reported failure; `diagnostic_text` is its stderr
    #[serde(rename_all = "camelCase")]
    ProcessFailure { diagnostic_text: String },
    /// Anything else that went wrong launching or waiting
    #[serde(rename_all = "camelCase")]
    UnexpectedFailure { diagnostic_text: String },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }

    /// Output path on success
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            ConversionResult::Success { output_path } => Some(output_path),
            _ => None,
        }
    }

    /// Short status line for the shell's status area
    pub fn status_text(&self) -> &'static str {
        match self {
            ConversionResult::Success { .. } => "Conversion completed successfully.",
            ConversionResult::ToolNotFound => "Error: FFmpeg not found.",
            ConversionResult::ProcessFailure { .. } => "An error occurred.",
            ConversionResult::UnexpectedFailure { .. } => "A critical error occurred.",
        }
    }

    /// Modal notification for the shell
    pub fn notice(&self) -> Notice {
        match self {
            ConversionResult::Success { output_path } => Notice {
                level: NoticeLevel::Info,
                title: "Success".to_string(),
                body: format!("Done! File saved as:\n{}", output_path.display()),
            },
            ConversionResult::ToolNotFound => Notice {
                level: NoticeLevel::Error,
                title: "Error".to_string(),
                body: FFmpegError::NotFound.to_string(),
            },
            ConversionResult::ProcessFailure { diagnostic_text } => Notice {
                level: NoticeLevel::Error,
                title: "FFmpeg Error".to_string(),
                body: format!("Conversion error:\n{}", diagnostic_text),
            },
            ConversionResult::UnexpectedFailure { diagnostic_text } => Notice {
                level: NoticeLevel::Error,
                title: "Critical Error".to_string(),
                body: format!("An unexpected error occurred:\n{}", diagnostic_text),
            },
        }
    }
}

impl From<FFmpegError> for ConversionResult {
    fn from(err: FFmpegError) -> Self {
        match err {
            FFmpegError::NotFound => ConversionResult::ToolNotFound,
            FFmpegError::ExecutionFailed(diagnostic_text) => {
                ConversionResult::ProcessFailure { diagnostic_text }
            }
            other => ConversionResult::UnexpectedFailure {
                diagnostic_text: other.to_string(),
            },
        }
    }
}

/// Severity of a [`Notice`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A titled message the shell shows once a conversion finishes
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}
