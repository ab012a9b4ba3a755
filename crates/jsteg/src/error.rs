//! Error types for jsteg hide and reveal operations.

use std::fmt;
use thiserror::Error;

/// Result type alias for jsteg operations.
pub type Result<T> = std::result::Result<T, JstegError>;

/// Errors that can occur while hiding or revealing data.
#[derive(Error)]
pub enum JstegError {
    /// Payload has more bits than the image has eligible coefficients.
    #[error("image is too small: payload needs {required} bits but only {available} coefficients are usable")]
    TooSmall { required: usize, available: usize },

    /// The carrier uses a JPEG feature outside of baseline sequential coding.
    #[error("unsupported JPEG feature: {0}")]
    Unsupported(String),

    /// The carrier is structurally invalid.
    #[error("invalid JPEG format: {0}")]
    Format(String),

    /// The image cannot be expressed as a JPEG frame.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    /// I/O error of the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JstegError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        JstegError::Format(reason.into())
    }

    pub(crate) fn unsupported(feature: impl Into<String>) -> Self {
        JstegError::Unsupported(feature.into())
    }
}

impl fmt::Debug for JstegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_small_message() {
        let err = JstegError::TooSmall {
            required: 80_000_000,
            available: 1234,
        };
        assert_eq!(
            err.to_string(),
            "image is too small: payload needs 80000000 bits but only 1234 coefficients are usable"
        );
    }

    #[test]
    fn test_debug_uses_display() {
        let err = JstegError::unsupported("progressive mode");
        assert_eq!(format!("{err:?}"), "unsupported JPEG feature: progressive mode");
    }

    #[test]
    fn test_io_error_passes_through() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err: JstegError = io.into();
        match err {
            JstegError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("expected Io error, got {other}"),
        }
    }
}
