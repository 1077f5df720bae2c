//! FFmpeg Detection Module
//!
//! Handles detection and validation of the FFmpeg binary.
//! Supports an explicitly configured path and system-installed binaries.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::debug;

use super::{FFmpegError, FFmpegResult, DEFAULT_FFMPEG_PROGRAM};
use crate::process::configure_std_command;

/// Where a detected FFmpeg binary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolSource {
    /// Explicit path from settings or the command line
    Configured,
    /// Found on the executable search path
    SearchPath,
    /// Found in a well-known install directory
    CommonLocation,
}

/// Information about a detected FFmpeg installation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FFmpegInfo {
    /// Path to ffmpeg binary
    pub ffmpeg_path: PathBuf,
    /// FFmpeg version string
    pub version: String,
    /// How the binary was located
    pub source: ToolSource,
}

/// Detect FFmpeg, preferring an explicitly configured binary.
///
/// A configured path that does not resolve is an error; it never silently
/// falls back to a different FFmpeg than the one the user asked for.
pub fn detect_ffmpeg(configured: Option<&Path>) -> FFmpegResult<FFmpegInfo> {
    if let Some(path) = configured {
        let ffmpeg_path = resolve_configured(path)?;
        let version = get_ffmpeg_version(&ffmpeg_path)?;
        return Ok(FFmpegInfo {
            ffmpeg_path,
            version,
            source: ToolSource::Configured,
        });
    }

    detect_system_ffmpeg()
}

/// Detect FFmpeg from system PATH, then common install locations.
pub fn detect_system_ffmpeg() -> FFmpegResult<FFmpegInfo> {
    let (ffmpeg_path, source) = match which::which(DEFAULT_FFMPEG_PROGRAM) {
        Ok(path) => (path, ToolSource::SearchPath),
        Err(e) => {
            debug!("ffmpeg not on PATH ({}), checking common locations", e);
            (find_in_common_paths()?, ToolSource::CommonLocation)
        }
    };

    let version = get_ffmpeg_version(&ffmpeg_path)?;

    Ok(FFmpegInfo {
        ffmpeg_path,
        version,
        source,
    })
}

fn resolve_configured(path: &Path) -> FFmpegResult<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    // Bare program names ("ffmpeg6") are looked up on PATH.
    which::which(path).map_err(|_| FFmpegError::NotFound)
}

fn find_in_common_paths() -> FFmpegResult<PathBuf> {
    #[cfg(target_os = "windows")]
    let binary_name = "ffmpeg.exe";

    #[cfg(not(target_os = "windows"))]
    let binary_name = "ffmpeg";

    get_common_ffmpeg_paths()
        .into_iter()
        .map(|dir| dir.join(binary_name))
        .find(|candidate| candidate.is_file())
        .ok_or(FFmpegError::NotFound)
}

/// Get common FFmpeg installation paths for the current platform
fn get_common_ffmpeg_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "windows")]
    {
        paths.push(PathBuf::from(r"C:\ffmpeg\bin"));
        paths.push(PathBuf::from(r"C:\Program Files\ffmpeg\bin"));
        paths.push(PathBuf::from(r"C:\Program Files (x86)\ffmpeg\bin"));

        // Chocolatey
        if let Ok(programdata) = std::env::var("ProgramData") {
            paths.push(PathBuf::from(programdata).join("chocolatey").join("bin"));
        }

        // Scoop
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join("scoop").join("shims"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        // Homebrew, MacPorts
        paths.push(PathBuf::from("/opt/homebrew/bin"));
        paths.push(PathBuf::from("/usr/local/bin"));
        paths.push(PathBuf::from("/opt/local/bin"));
    }

    #[cfg(target_os = "linux")]
    {
        paths.push(PathBuf::from("/usr/bin"));
        paths.push(PathBuf::from("/usr/local/bin"));
        paths.push(PathBuf::from("/snap/bin"));
    }

    paths
}

/// Run `ffmpeg -version` and extract the version string
fn get_ffmpeg_version(ffmpeg_path: &Path) -> FFmpegResult<String> {
    let mut cmd = Command::new(ffmpeg_path);
    configure_std_command(&mut cmd);

    let output = cmd
        .arg("-version")
        .output()
        .map_err(FFmpegError::from_spawn)?;

    if !output.status.success() {
        return Err(FFmpegError::ExecutionFailed(
            "FFmpeg binary is not functional".to_string(),
        ));
    }

    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse the version from the first line: "ffmpeg version X.X.X ..."
fn parse_version_output(output: &str) -> FFmpegResult<String> {
    let first_line = output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| FFmpegError::ParseError("Could not parse FFmpeg version".to_string()))?;

    let version = first_line
        .strip_prefix("ffmpeg version ")
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or(first_line);

    Ok(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_paths_not_empty() {
        #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
        assert!(!get_common_ffmpeg_paths().is_empty());
    }

    #[test]
    fn test_parse_release_version() {
        let out = "ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023 the FFmpeg developers\nbuilt with gcc 13\n";
        assert_eq!(parse_version_output(out).unwrap(), "6.1.1-3ubuntu5");
    }

    #[test]
    fn test_parse_unexpected_first_line_is_kept_whole() {
        let out = "custom build of ffmpeg\n";
        assert_eq!(parse_version_output(out).unwrap(), "custom build of ffmpeg");
    }

    #[test]
    fn test_parse_empty_output_fails() {
        assert!(matches!(
            parse_version_output("\n\n"),
            Err(FFmpegError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_configured_path_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("no-such-ffmpeg");
        assert!(matches!(
            detect_ffmpeg(Some(&missing)),
            Err(FFmpegError::NotFound)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_stub_reports_version() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let stub = dir.path().join("ffmpeg");
        std::fs::write(
            &stub,
            "#!/bin/sh\necho 'ffmpeg version 7.0-stub Copyright (c) the FFmpeg developers'\n",
        )
        .unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let info = detect_ffmpeg(Some(&stub)).unwrap();
        assert_eq!(info.version, "7.0-stub");
        assert_eq!(info.source, ToolSource::Configured);
        assert_eq!(info.ffmpeg_path, stub);
    }

    #[test]
    fn test_detect_system_ffmpeg() {
        // Passes whether or not FFmpeg is installed on the machine
        match detect_system_ffmpeg() {
            Ok(info) => {
                assert!(!info.version.is_empty());
                assert_ne!(info.source, ToolSource::Configured);
            }
            Err(FFmpegError::NotFound) => {}
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
