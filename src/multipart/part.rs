use http::header::{HeaderName, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use http::HeaderMap;

use crate::error::MalformedReason;
use crate::helpers::traits::bytes::SplitBytes;
use crate::helpers::traits::{decode_header_text, GetHeaderChild};

/// A text form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub name: String,
    pub value: String,
}

/// An uploaded file. `content` holds the exact payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub field_name: String,
    /// Declared filename, verbatim. Not safe to use as a path.
    pub filename: String,
    /// The part's own `Content-Type`, when it sent one.
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

impl DecodedFile {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Declared content type, else a guess from the filename extension.
    pub fn mime_type(&self) -> String {
        match &self.content_type {
            Some(content_type) => content_type.clone(),
            None => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPart {
    Field(DecodedField),
    File(DecodedFile),
}

/// Headers of one part plus the parameters of its `Content-Disposition`.
#[derive(Debug, Clone)]
pub struct PartHeaders {
    headers: HeaderMap,
    name: String,
    filename: Option<String>,
}

impl PartHeaders {
    pub fn parse(block: &[u8]) -> Result<Self, MalformedReason> {
        let text = decode_header_text(block);

        let mut headers = HeaderMap::new();
        for line in text.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Ok(key) = HeaderName::from_bytes(key.trim().as_bytes()) else {
                continue;
            };
            match HeaderValue::from_bytes(value.trim().as_bytes()) {
                Ok(value) => {
                    headers.append(key, value);
                }
                Err(_) if key == CONTENT_DISPOSITION => {
                    return Err(MalformedReason::InvalidContentDisposition);
                }
                Err(_) => continue,
            }
        }

        let (name, filename) = {
            let disposition = headers
                .get(CONTENT_DISPOSITION)
                .ok_or(MalformedReason::MissingContentDisposition)?;
            // Values were inserted from `text`, so they are valid UTF-8.
            let disposition = String::from_utf8_lossy(disposition.as_bytes());

            if !disposition.get_header_type().eq_ignore_ascii_case("form-data") {
                return Err(MalformedReason::NotFormData);
            }

            let params = disposition.get_header_child();
            let name = match params.get("name") {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(MalformedReason::MissingName),
            };
            (name, params.get("filename").map(|filename| filename.to_string()))
        };

        Ok(Self {
            headers,
            name,
            filename,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Classifies the part: a `filename` parameter makes it a file. Field values
    /// are trimmed, file bytes are copied untouched.
    pub fn into_part(self, body: &[u8]) -> DecodedPart {
        let content_type = self.content_type();
        match self.filename {
            Some(filename) => DecodedPart::File(DecodedFile {
                field_name: self.name,
                filename,
                content_type,
                content: body.to_vec(),
            }),
            None => DecodedPart::Field(DecodedField {
                name: self.name,
                value: String::from_utf8_lossy(body).trim().to_string(),
            }),
        }
    }
}

/// Decodes one raw part as produced by [`super::boundary::split`].
pub fn decode_part(raw: &[u8]) -> Result<DecodedPart, MalformedReason> {
    let (head, body) = raw
        .split_header_body()
        .ok_or(MalformedReason::MissingHeaderTerminator)?;
    let headers = PartHeaders::parse(head)?;
    Ok(headers.into_part(body))
}
