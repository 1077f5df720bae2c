//! Non-conversion subcommands: formats, doctor, config.

use anyhow::Context;
use serde::Serialize;
use vconv_core::conversion::RECOGNIZED_INPUT_EXTENSIONS;
use vconv_core::ffmpeg::{detect_ffmpeg, FFmpegError, ToolSource};
use vconv_core::settings::{AppSettings, SettingsManager};
use vconv_core::ContainerFormat;

use crate::cli::ConfigCommand;
use crate::shell::{EXIT_FAILED, EXIT_OK};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatList {
    output_formats: Vec<&'static str>,
    recognized_inputs: &'static [&'static str],
}

pub fn run_formats(json: bool) -> anyhow::Result<u8> {
    let list = FormatList {
        output_formats: ContainerFormat::tokens().to_vec(),
        recognized_inputs: RECOGNIZED_INPUT_EXTENSIONS,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        println!("Output formats:    {}", list.output_formats.join(", "));
        println!("Recognized inputs: {}", list.recognized_inputs.join(", "));
    }
    Ok(EXIT_OK)
}

pub fn run_doctor(
    flag: Option<std::path::PathBuf>,
    settings: &AppSettings,
    json: bool,
) -> anyhow::Result<u8> {
    let configured = flag.or_else(|| settings.ffmpeg_path());

    match detect_ffmpeg(configured.as_deref()) {
        Ok(info) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("FFmpeg:  {}", info.ffmpeg_path.display());
                println!("Version: {}", info.version);
                println!("Source:  {}", describe_source(info.source));
            }
            Ok(EXIT_OK)
        }
        Err(FFmpegError::NotFound) => {
            eprintln!("{}", FFmpegError::NotFound);
            if let Some(path) = configured {
                eprintln!("Configured path: {}", path.display());
            }
            Ok(EXIT_FAILED)
        }
        Err(e) => {
            eprintln!("FFmpeg was found but is not usable: {}", e);
            Ok(EXIT_FAILED)
        }
    }
}

fn describe_source(source: ToolSource) -> &'static str {
    match source {
        ToolSource::Configured => "configured path",
        ToolSource::SearchPath => "PATH",
        ToolSource::CommonLocation => "common install location",
    }
}

pub fn run_config(command: ConfigCommand, manager: &SettingsManager) -> anyhow::Result<u8> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&manager.load())?);
        }
        ConfigCommand::Path => {
            println!("{}", manager.settings_path().display());
        }
        ConfigCommand::Reset => {
            manager.reset().context("Failed to reset settings")?;
            println!("Settings reset to defaults.");
        }
        ConfigCommand::Set {
            default_format,
            ffmpeg,
            log_level,
            log_dir,
        } => {
            let mut settings = manager.load();
            if let Some(format) = default_format {
                settings.conversion.default_format = format.as_str().to_string();
            }
            if let Some(path) = ffmpeg {
                settings.ffmpeg.path = Some(path);
            }
            if let Some(level) = log_level {
                settings.logging.level = level;
            }
            if let Some(dir) = log_dir {
                settings.logging.directory = Some(dir);
            }

            let saved = manager.save(&settings).context("Failed to save settings")?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_set_persists_and_normalizes() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path().to_path_buf());

        let code = run_config(
            ConfigCommand::Set {
                default_format: Some(ContainerFormat::Avi),
                ffmpeg: Some("  ".to_string()),
                log_level: Some("WARN".to_string()),
                log_dir: None,
            },
            &manager,
        )
        .unwrap();
        assert_eq!(code, EXIT_OK);

        let settings = manager.load();
        assert_eq!(settings.default_format(), ContainerFormat::Avi);
        assert!(settings.ffmpeg.path.is_none());
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_config_reset_removes_file() {
        let dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(dir.path().to_path_buf());
        manager.save(&AppSettings::default()).unwrap();

        run_config(ConfigCommand::Reset, &manager).unwrap();
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_doctor_with_missing_configured_binary_fails() {
        let dir = TempDir::new().unwrap();
        let code = run_doctor(
            Some(dir.path().join("missing-ffmpeg")),
            &AppSettings::default(),
            false,
        )
        .unwrap();
        assert_eq!(code, EXIT_FAILED);
    }

    #[test]
    fn test_format_list_serialization() {
        let list = FormatList {
            output_formats: ContainerFormat::tokens().to_vec(),
            recognized_inputs: RECOGNIZED_INPUT_EXTENSIONS,
        };
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["outputFormats"], serde_json::json!(["mp4", "avi", "mov", "wmv"]));
        assert_eq!(json["recognizedInputs"][3], "mkv");
    }
}
