use http::header::CONTENT_TYPE;
use http::{HeaderMap, Request};

use crate::error::MultipartError;
use crate::multipart::{Form, MultipartDecoder};
use crate::Body;

/// RFC 2046 caps boundaries at 70 characters.
const MAX_BOUNDARY_LEN: usize = 70;

/// Extracts the boundary from a `multipart/form-data; boundary=...` value.
pub fn parse_boundary(content_type: &str) -> Result<String, MultipartError> {
    let mut params = content_type.split(';');
    let media_type = params.next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case("multipart/form-data") {
        return Err(MultipartError::InvalidContentType(format!(
            "expected multipart/form-data, got {:?}",
            media_type
        )));
    }

    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("boundary") {
            continue;
        }

        let boundary = value.trim().trim_matches('"');
        if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN {
            return Err(MultipartError::InvalidContentType(format!(
                "invalid boundary {:?}",
                boundary
            )));
        }
        return Ok(boundary.to_string());
    }

    Err(MultipartError::InvalidContentType(
        "missing boundary parameter".into(),
    ))
}

pub fn boundary_from_headers(headers: &HeaderMap) -> Result<String, MultipartError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .ok_or_else(|| MultipartError::InvalidContentType("missing content-type".into()))?
        .to_str()
        .map_err(|_| MultipartError::InvalidContentType("content-type is not ASCII".into()))?;
    parse_boundary(content_type)
}

pub trait RequestUtils {
    fn get_boundary(&self) -> Result<String, MultipartError>;
    fn get_multi_part(&self) -> Result<Form, MultipartError>;
    fn get_multi_part_with(&self, decoder: &MultipartDecoder) -> Result<Form, MultipartError>;
}

impl RequestUtils for Request<Body> {
    fn get_boundary(&self) -> Result<String, MultipartError> {
        boundary_from_headers(self.headers())
    }

    fn get_multi_part(&self) -> Result<Form, MultipartError> {
        self.get_multi_part_with(&MultipartDecoder::default())
    }

    fn get_multi_part_with(&self, decoder: &MultipartDecoder) -> Result<Form, MultipartError> {
        let boundary = self.get_boundary()?;
        decoder.decode(&self.body().bytes, &boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_quoted_boundaries() {
        assert_eq!(
            parse_boundary("multipart/form-data; boundary=----WebKitFormBoundary7MA4YWxkTrZu0gW")
                .unwrap(),
            "----WebKitFormBoundary7MA4YWxkTrZu0gW"
        );
        assert_eq!(
            parse_boundary(r#"Multipart/Form-Data; charset=utf-8; Boundary="abc""#).unwrap(),
            "abc"
        );
    }

    #[test]
    fn rejects_bad_content_types() {
        for content_type in [
            "application/json",
            "multipart/mixed; boundary=abc",
            "multipart/form-data",
            "multipart/form-data; boundary=",
            "multipart/form-data; boundary=\"\"",
        ] {
            assert!(
                matches!(
                    parse_boundary(content_type),
                    Err(MultipartError::InvalidContentType(_))
                ),
                "{content_type} should be rejected"
            );
        }

        let too_long = format!("multipart/form-data; boundary={}", "a".repeat(71));
        assert!(parse_boundary(&too_long).is_err());
    }

    #[test]
    fn missing_header_is_invalid_content_type() {
        let request = Request::builder()
            .body(Body::new(b"--b--".to_vec()))
            .unwrap();
        assert!(matches!(
            request.get_multi_part(),
            Err(MultipartError::InvalidContentType(_))
        ));
    }
}
