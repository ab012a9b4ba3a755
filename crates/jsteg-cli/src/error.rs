use std::fmt;
use std::path::PathBuf;

use jsteg::JstegError;
use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Error)]
pub enum CliError {
    /// Hiding or revealing failed inside the codec
    #[error(transparent)]
    Jsteg(#[from] JstegError),

    /// The carrier image could not be loaded
    #[error("Image media is invalid: {0}")]
    InvalidImageMedia(#[from] image::ImageError),

    /// Represents a failure to read from input.
    #[error("Read error on {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a failure to write target file.
    #[error("Write error on {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Represents a failure to read from stdin.
    #[error("Read error on stdin: {0}")]
    StdinError(#[source] std::io::Error),

    /// Represents a failure to write to stdout.
    #[error("Write error on stdout: {0}")]
    StdoutError(#[source] std::io::Error),

    /// The revealed bits do not start with the framing magic
    #[error("No hidden data found")]
    NoHiddenData,

    /// The declared length runs past the revealed bits
    #[error("Hidden data is malformed: {declared} bytes declared but only {available} available")]
    MalformedHiddenData { declared: usize, available: usize },

    /// The payload length does not fit the 32 bit length field
    #[error("Payload of {0} bytes is too large")]
    PayloadTooLarge(usize),
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // main() reports errors through Debug
        write!(f, "{self}")
    }
}
