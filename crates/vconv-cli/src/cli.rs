//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vconv_core::ContainerFormat;

#[derive(Debug, Parser)]
#[command(
    name = "vconv",
    version,
    about = "Convert a video file into another container format with FFmpeg"
)]
pub struct Cli {
    /// Directory holding settings.json (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Also print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a video file
    Convert(ConvertArgs),

    /// List output formats and recognized input types
    Formats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Locate FFmpeg and report its version
    Doctor {
        /// FFmpeg binary to check instead of the configured one
        #[arg(long, value_name = "PATH")]
        ffmpeg: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or change persistent settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Video file to convert
    pub input: Option<PathBuf>,

    /// Output container: mp4, avi, mov or wmv (defaults to the configured format)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<ContainerFormat>,

    /// FFmpeg binary to use for this run
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Print every event as a JSON line instead of status text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the current settings
    Show,

    /// Print the settings file location
    Path,

    /// Delete the settings file and restore defaults
    Reset,

    /// Update one or more settings
    Set {
        /// Default output container
        #[arg(long, value_name = "FORMAT")]
        default_format: Option<ContainerFormat>,

        /// FFmpeg binary; pass an empty string to go back to PATH lookup
        #[arg(long, value_name = "PATH")]
        ffmpeg: Option<String>,

        /// Log level: trace, debug, info, warn or error
        #[arg(long, value_name = "LEVEL")]
        log_level: Option<String>,

        /// Directory for log files; pass an empty string for the default
        #[arg(long, value_name = "DIR")]
        log_dir: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["vconv", "convert", "/videos/clip.mkv", "-f", "MOV"]).unwrap();
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(args.input, Some(PathBuf::from("/videos/clip.mkv")));
                assert_eq!(args.format, Some(ContainerFormat::Mov));
                assert!(args.ffmpeg.is_none());
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert_without_input() {
        let cli = Cli::try_parse_from(["vconv", "convert"]).unwrap();
        assert!(matches!(cli.command, Command::Convert(ConvertArgs { input: None, .. })));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["vconv", "convert", "clip.mkv", "--format", "mkv"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vconv", "doctor", "--config-dir", "/tmp/vconv", "-v"]).unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/vconv")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from([
            "vconv",
            "config",
            "set",
            "--default-format",
            "wmv",
            "--ffmpeg",
            "",
        ])
        .unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Set {
                default_format,
                ffmpeg,
                log_level,
                log_dir,
            }) => {
                assert_eq!(default_format, Some(ContainerFormat::Wmv));
                assert_eq!(ffmpeg.as_deref(), Some(""));
                assert!(log_level.is_none());
                assert!(log_dir.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
