//! Foreground side of a conversion.
//!
//! The conversion runs on a background task; this module drains its events on
//! the main task and is the only code that touches [`ShellState`].

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::warn;
use vconv_core::conversion::{is_recognized_video, READY_STATUS};
use vconv_core::settings::AppSettings;
use vconv_core::{
    validate_input_file, ConversionEvent, ConversionRequest, ConversionResult, ConversionRunner,
    ConversionWorker, Notice, NoticeLevel,
};

use crate::cli::ConvertArgs;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Presentation state owned by the foreground
#[derive(Debug)]
pub struct ShellState {
    status: String,
    result: Option<ConversionResult>,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            status: READY_STATUS.to_string(),
            result: None,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        self.result.as_ref()
    }

    pub fn select_file(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.status = format!("Selected file: {}", name);
    }

    /// Applies one event and returns the new status line
    pub fn apply(&mut self, event: &ConversionEvent) -> &str {
        self.status = event.status_text().to_string();
        if let ConversionEvent::Finished { result, .. } = event {
            self.result = Some(result.clone());
        }
        &self.status
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the FFmpeg binary: `--ffmpeg`, then settings, then PATH lookup
pub fn runner_for(flag: Option<PathBuf>, settings: &AppSettings) -> ConversionRunner {
    match flag.or_else(|| settings.ffmpeg_path()) {
        Some(path) => ConversionRunner::new(path),
        None => ConversionRunner::system(),
    }
}

/// Runs one conversion end to end and returns the process exit status
pub async fn run_convert(args: ConvertArgs, settings: &AppSettings) -> anyhow::Result<u8> {
    let mut state = ShellState::new();

    let input = args.input.unwrap_or_default();
    if let Err(e) = validate_input_file(&input) {
        render_notice(&Notice {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            body: e.to_string(),
        });
        return Ok(EXIT_USAGE);
    }

    if !is_recognized_video(&input) {
        warn!(
            "{} does not look like a video file; passing it to FFmpeg anyway",
            input.display()
        );
    }

    state.select_file(&input);
    if !args.json {
        println!("{}", state.status());
    }

    let format = args.format.unwrap_or_else(|| settings.default_format());
    let request = ConversionRequest::new(input, format)?;

    let mut worker = ConversionWorker::new(runner_for(args.ffmpeg, settings));
    let mut events = worker
        .take_event_receiver()
        .context("Conversion event receiver already taken")?;
    let handle = worker.submit(request);

    while let Some(event) = events.recv().await {
        if event.job_id() != handle.id {
            continue;
        }

        let status = state.apply(&event).to_string();
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", status);
        }

        if event.is_terminal() {
            break;
        }
    }

    let result = match state.result() {
        Some(result) => result.clone(),
        None => handle.wait().await,
    };

    if !args.json {
        render_notice(&result.notice());
    }

    Ok(if result.is_success() {
        EXIT_OK
    } else {
        EXIT_FAILED
    })
}

/// Prints a notice: informational to stdout, errors to stderr
pub fn render_notice(notice: &Notice) {
    let text = format!("\n[{}]\n{}", notice.title, notice.body);
    match notice.level {
        NoticeLevel::Info => println!("{}", text),
        NoticeLevel::Error => {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", text.trim_end());
        }
    }
}
