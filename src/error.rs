use std::fmt;

use thiserror::Error;

/// Decode failures. Every variant is terminal for the call that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultipartError {
    /// The boundary token could not be derived from the content type.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),
    /// Delimiters were found but the body never closes with `--boundary--`.
    #[error("multipart body is missing the terminal boundary marker")]
    NoTerminalMarker,
    #[error("malformed part #{index}: {reason}")]
    MalformedPart { index: usize, reason: MalformedReason },
    #[error("too many parts: {count} exceeds limit of {max}")]
    TooManyParts { count: usize, max: usize },
    #[error("file too large: {size} bytes exceeds limit of {max}")]
    FileTooLarge { size: usize, max: usize },
}

/// Why a single part was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// No blank line between the header block and the body.
    MissingHeaderTerminator,
    MissingContentDisposition,
    /// A `Content-Disposition` line is present but its value holds bytes no
    /// header value may contain.
    InvalidContentDisposition,
    /// Disposition type is something other than `form-data`.
    NotFormData,
    /// `name` parameter absent or empty.
    MissingName,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::MissingHeaderTerminator => "missing blank line after part headers",
            Self::MissingContentDisposition => "missing Content-Disposition header",
            Self::InvalidContentDisposition => "Content-Disposition has invalid characters",
            Self::NotFormData => "Content-Disposition is not form-data",
            Self::MissingName => "Content-Disposition has no name parameter",
        };
        f.write_str(reason)
    }
}

/// Errors raised around the decoder: reading the body and storing uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out after {0}ms waiting for request body")]
    Timeout(u64),
    #[error("request body too large: {size} bytes exceeds limit of {max}")]
    BodyTooLarge { size: usize, max: usize },
}
