//! FFmpeg Integration Module
//!
//! Locates the FFmpeg binary and describes the failures that can happen while
//! talking to it. The conversion itself lives in [`crate::conversion`].
//!
//! The tool is resolved in this order:
//! 1. an explicit path from settings or the `--ffmpeg` flag
//! 2. the host executable search path (`PATH`)
//! 3. well-known install locations for the current platform

mod detection;

pub use detection::*;

/// Program name used when no explicit FFmpeg path is configured.
///
/// Left bare so the operating system resolves it against `PATH` at spawn time.
pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

/// FFmpeg-related error types
#[derive(Debug, thiserror::Error)]
pub enum FFmpegError {
    #[error("FFmpeg not found. Make sure it is installed and added to PATH.")]
    NotFound,

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Process error: {0}")]
    ProcessError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type FFmpegResult<T> = Result<T, FFmpegError>;

impl FFmpegError {
    /// Classify a spawn/wait failure.
    ///
    /// A missing executable is reported as [`FFmpegError::NotFound`]; every
    /// other I/O failure keeps its original description.
    pub fn from_spawn(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            FFmpegError::NotFound
        } else {
            FFmpegError::ProcessError(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_error_display() {
        let err = FFmpegError::NotFound;
        assert!(err.to_string().contains("FFmpeg not found"));

        let err = FFmpegError::ExecutionFailed("exit code 1".to_string());
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_from_spawn_maps_not_found() {
        let err = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(FFmpegError::from_spawn(err), FFmpegError::NotFound));

        let err = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            FFmpegError::from_spawn(err),
            FFmpegError::ProcessError(_)
        ));
    }
}
