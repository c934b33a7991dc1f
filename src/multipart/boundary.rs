//! Splits a buffered multipart body into raw parts.

use crate::error::MultipartError;
use crate::helpers::traits::bytes::SplitBytes;

/// Returns the raw parts between the `--boundary` delimiters.
///
/// The delimiter is searched for byte by byte so binary payloads are never
/// decoded. The preamble before the first delimiter and the `--` terminal marker
/// (plus any epilogue) are discarded. Each part loses one leading and one
/// trailing `\r\n`; parts left empty by that are dropped.
///
/// A body without any delimiter yields no parts. A body with delimiters whose
/// last one is not `--boundary--` is rejected with
/// [`MultipartError::NoTerminalMarker`].
pub fn split<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>, MultipartError> {
    if boundary.is_empty() {
        return Err(MultipartError::InvalidContentType(
            "empty multipart boundary".into(),
        ));
    }
    let delimiter = format!("--{}", boundary);

    let mut pieces = body.split_bytes(delimiter.as_bytes());
    if pieces.len() < 2 {
        return Ok(Vec::new());
    }

    match pieces.pop() {
        Some(last) if last.starts_with(b"--") => {}
        _ => return Err(MultipartError::NoTerminalMarker),
    }

    Ok(pieces
        .into_iter()
        .skip(1)
        .map(|part| part.trim_crlf())
        .filter(|part| !part.is_empty())
        .collect())
}
