//! Conversion Runner
//!
//! Runs one FFmpeg invocation per request and folds every way it can end into
//! a [`ConversionResult`]. Nothing here returns `Err`: the caller always gets a
//! value it can hand to the shell.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{invocation_args, ConversionRequest, ConversionResult};
use crate::ffmpeg::{FFmpegError, FFmpegInfo, DEFAULT_FFMPEG_PROGRAM};
use crate::process::{configure_std_command, configure_tokio_command};

/// Executes container conversions with a fixed FFmpeg binary
#[derive(Clone, Debug)]
pub struct ConversionRunner {
    program: Arc<PathBuf>,
}

impl ConversionRunner {
    /// Create a runner for an explicit FFmpeg path or program name
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: Arc::new(program.into()),
        }
    }

    /// Runner that lets the OS resolve `ffmpeg` on `PATH` at spawn time
    pub fn system() -> Self {
        Self::new(DEFAULT_FFMPEG_PROGRAM)
    }

    /// Runner for a binary found by [`crate::ffmpeg::detect_ffmpeg`]
    pub fn from_info(info: &FFmpegInfo) -> Self {
        Self::new(info.ffmpeg_path.clone())
    }

    /// The program this runner spawns
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Convert `request`, waiting for FFmpeg to exit.
    ///
    /// Stdout and stderr are drained fully before the exit status is read.
    pub async fn run(&self, request: &ConversionRequest) -> ConversionResult {
        let args = invocation_args(request);
        info!(
            input = %request.input_path().display(),
            format = %request.target_format(),
            "Starting conversion"
        );
        debug!(program = %self.program.display(), ?args, "Spawning FFmpeg");

        let mut cmd = tokio::process::Command::new(self.program.as_path());
        configure_tokio_command(&mut cmd);
        let output = cmd.args(&args).output().await;

        classify(request, output)
    }

    /// Blocking variant of [`ConversionRunner::run`] for callers without a runtime
    pub fn run_blocking(&self, request: &ConversionRequest) -> ConversionResult {
        let args = invocation_args(request);
        info!(
            input = %request.input_path().display(),
            format = %request.target_format(),
            "Starting conversion (blocking)"
        );
        debug!(program = %self.program.display(), ?args, "Spawning FFmpeg");

        let mut cmd = std::process::Command::new(self.program.as_path());
        configure_std_command(&mut cmd);
        let output = cmd.args(&args).output();

        classify(request, output)
    }
}

impl Default for ConversionRunner {
    fn default() -> Self {
        Self::system()
    }
}

fn classify(request: &ConversionRequest, output: std::io::Result<Output>) -> ConversionResult {
    let output = match output {
        Ok(output) => output,
        Err(e) => {
            let err = FFmpegError::from_spawn(e);
            warn!("Failed to launch FFmpeg: {}", err);
            return err.into();
        }
    };

    if output.status.success() {
        let output_path = request.output_path();
        info!(output = %output_path.display(), "Conversion finished");
        return ConversionResult::Success { output_path };
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    warn!(status = %output.status, "FFmpeg exited with failure");
    FFmpegError::ExecutionFailed(stderr).into()
}
