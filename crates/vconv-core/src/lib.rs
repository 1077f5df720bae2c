//! vconv Core Library
//!
//! Converts a local video file into another container format by handing the
//! work to an external FFmpeg binary.
//!
//! The library owns no presentation state. A front-end (the `vconv` CLI, or
//! any other shell) builds a [`ConversionRequest`], submits it to a
//! [`ConversionWorker`], and renders the ordered [`ConversionEvent`]s that
//! come back over the worker's channel.

pub mod conversion;
pub mod ffmpeg;
pub mod jobs;
pub mod process;
pub mod settings;

mod error;
pub use error::*;

pub use conversion::{
    derive_output_path, invocation_args, validate_input_file, ContainerFormat,
    ConversionRequest, ConversionResult, ConversionRunner, Notice, NoticeLevel,
};
pub use jobs::{ConversionEvent, ConversionHandle, ConversionWorker, JobId};
