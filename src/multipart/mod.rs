//! `multipart/form-data` decoding.
//!
//! Decoding runs in three steps over a fully buffered body:
//! [`boundary::split`] cuts the body into raw parts on the byte-exact
//! delimiter, [`part::decode_part`] separates headers from payload and classifies
//! each part as a field or a file, and [`form::assemble`] collects the results.
//! Nothing here does I/O or keeps state between calls.

pub mod boundary;
pub mod form;
pub mod part;

pub use form::{assemble, Form};
pub use part::{decode_part, DecodedField, DecodedFile, DecodedPart, PartHeaders};

use crate::error::MultipartError;

/// Default maximum number of parts (fields and files together).
pub const DEFAULT_MAX_PARTS: usize = 100;

/// Default maximum size of a single file (10MB).
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Reusable decoder. Holds only limits, so one instance can serve any number of
/// requests from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartDecoder {
    max_parts: usize,
    max_file_size: usize,
}

impl Default for MultipartDecoder {
    fn default() -> Self {
        Self {
            max_parts: DEFAULT_MAX_PARTS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl MultipartDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_parts(mut self, count: usize) -> Self {
        self.max_parts = count;
        self
    }

    #[must_use]
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn get_max_parts(&self) -> usize {
        self.max_parts
    }

    pub fn get_max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Decodes `body` using the delimiter `--{boundary}`.
    ///
    /// Fails on the first malformed part; no partial form is ever returned.
    pub fn decode(&self, body: &[u8], boundary: &str) -> Result<Form, MultipartError> {
        let raw_parts = boundary::split(body, boundary)?;
        if raw_parts.len() > self.max_parts {
            return Err(MultipartError::TooManyParts {
                count: raw_parts.len(),
                max: self.max_parts,
            });
        }

        let mut parts = Vec::with_capacity(raw_parts.len());
        for (index, raw) in raw_parts.into_iter().enumerate() {
            let part = decode_part(raw)
                .map_err(|reason| MultipartError::MalformedPart { index, reason })?;

            if let DecodedPart::File(file) = &part {
                if file.len() > self.max_file_size {
                    return Err(MultipartError::FileTooLarge {
                        size: file.len(),
                        max: self.max_file_size,
                    });
                }
            }
            parts.push(part);
        }

        Ok(assemble(parts))
    }
}

/// Decodes `body` with default limits.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<Form, MultipartError> {
    MultipartDecoder::default().decode(body, boundary)
}
