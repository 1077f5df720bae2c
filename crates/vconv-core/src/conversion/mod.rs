//! Conversion Module
//!
//! Request/result types for a single container conversion and the runner that
//! shells out to FFmpeg.

mod result;
mod runner;

pub use result::*;
pub use runner::*;

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Input extensions the file picker offers as "video files".
///
/// Anything else may still be converted; shells only use this list to warn.
pub const RECOGNIZED_INPUT_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv"];

// =============================================================================
// Container Format
// =============================================================================

/// Output container format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    #[default]
    Mp4,
    Avi,
    Mov,
    Wmv,
}

impl ContainerFormat {
    /// Every selectable format, in menu order
    pub const ALL: [ContainerFormat; 4] = [
        ContainerFormat::Mp4,
        ContainerFormat::Avi,
        ContainerFormat::Mov,
        ContainerFormat::Wmv,
    ];

    /// Lowercase token, also used as the output file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "mp4",
            ContainerFormat::Avi => "avi",
            ContainerFormat::Mov => "mov",
            ContainerFormat::Wmv => "wmv",
        }
    }

    /// Tokens of every selectable format
    pub fn tokens() -> [&'static str; 4] {
        Self::ALL.map(|f| f.as_str())
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| CoreError::UnsupportedFormat(token.to_string()))
    }
}

// =============================================================================
// Conversion Request
// =============================================================================

/// An immutable request to convert one file into one container format
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    input_path: PathBuf,
    target_format: ContainerFormat,
}

impl ConversionRequest {
    /// Creates a request.
    ///
    /// Rejects an empty path or one without a file name component. Whether the
    /// file exists is left to [`validate_input_file`] and to the tool itself.
    pub fn new(input_path: impl Into<PathBuf>, target_format: ContainerFormat) -> CoreResult<Self> {
        let input_path = input_path.into();

        if input_path.as_os_str().is_empty() {
            return Err(CoreError::ValidationError(
                "Please select a video file first.".to_string(),
            ));
        }
        if input_path.file_name().is_none() {
            return Err(CoreError::ValidationError(format!(
                "Input path has no file name: {}",
                input_path.display()
            )));
        }

        Ok(Self {
            input_path,
            target_format,
        })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn target_format(&self) -> ContainerFormat {
        self.target_format
    }

    /// Where the converted file will be written
    pub fn output_path(&self) -> PathBuf {
        derive_output_path(&self.input_path, self.target_format)
    }
}

/// Derives the output path: same directory, same base name, new extension.
///
/// Only the last extension is replaced (`a.tar.mkv` becomes `a.tar.mp4`). If the
/// input already carries the target extension the result equals the input.
pub fn derive_output_path(input: &Path, format: ContainerFormat) -> PathBuf {
    input.with_extension(format.as_str())
}

/// Arguments passed to FFmpeg: `-i <input> -y <output>`.
///
/// No codec flags are forced; FFmpeg picks its defaults for the container.
pub fn invocation_args(request: &ConversionRequest) -> Vec<OsString> {
    vec![
        OsString::from("-i"),
        request.input_path.clone().into_os_string(),
        OsString::from("-y"),
        request.output_path().into_os_string(),
    ]
}

/// Checks that the selected input exists and is a regular file.
pub fn validate_input_file(path: &Path) -> CoreResult<()> {
    if path.as_os_str().is_empty() {
        return Err(CoreError::ValidationError(
            "Please select a video file first.".to_string(),
        ));
    }
    if !path.exists() {
        return Err(CoreError::FileNotFound(path.display().to_string()));
    }
    if !path.is_file() {
        return Err(CoreError::ValidationError(format!(
            "Not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Whether the file picker would list this path under "video files"
pub fn is_recognized_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            RECOGNIZED_INPUT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
