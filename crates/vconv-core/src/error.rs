//! vconv Error Definitions
//!
//! Defines error types used throughout the library.

use thiserror::Error;

use crate::ffmpeg::FFmpegError;

/// Core library error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    // =========================================================================
    // Settings Errors
    // =========================================================================
    #[error("Settings error: {0}")]
    SettingsError(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error(transparent)]
    FFmpeg(#[from] FFmpegError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core library result type
pub type CoreResult<T> = Result<T, CoreError>;
