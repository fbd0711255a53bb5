//! Error types for frame decoding and stream processing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a single frame decode.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A required argument was missing or unusable.
    #[error("invalid argument: {what}")]
    InvalidArgument { what: &'static str },

    /// Input buffer was not exactly one frame long.
    #[error("invalid frame length: expected {expected} bytes, got {got}")]
    FrameLength { expected: usize, got: usize },
}

/// Errors that abort decoding of an `.ambe` stream.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("cannot open input file '{}'", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot open output file '{}'", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to read AMBE data")]
    Read(#[source] io::Error),

    #[error("failed to write PCM data")]
    Write(#[source] io::Error),
}
