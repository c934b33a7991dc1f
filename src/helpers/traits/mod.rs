pub mod bytes;
pub mod http_request;
pub mod http_stream;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

// `; key="value"`. Backslash escapes are matched so an embedded `\"` does not end
// the value, but they are returned verbatim rather than unescaped.
fn quoted_param_regex() -> &'static Regex {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    PARAM.get_or_init(|| {
        Regex::new(r#";\s*([A-Za-z0-9!#$%&'*+.^_`|~-]+)\s*=\s*"((?:[^"\\]|\\.)*)""#)
            .expect("parameter pattern is valid")
    })
}

pub trait GetHeaderChild {
    /// The value before the first `;`, e.g. `form-data`.
    fn get_header_type(&self) -> &str;
    /// Quoted parameters keyed by lowercased name. The first occurrence of a
    /// name wins.
    fn get_header_child(&self) -> HashMap<String, &str>;
}

impl GetHeaderChild for str {
    fn get_header_type(&self) -> &str {
        self.split(';').next().unwrap_or_default().trim()
    }

    fn get_header_child(&self) -> HashMap<String, &str> {
        let mut params = HashMap::new();

        // Content-Disposition 파싱: form-data; name="field"; filename="file.txt"
        for captures in quoted_param_regex().captures_iter(self) {
            if let (Some(key), Some(value)) = (captures.get(1), captures.get(2)) {
                params
                    .entry(key.as_str().to_ascii_lowercase())
                    .or_insert(value.as_str());
            }
        }

        params
    }
}

/// Header bytes as text: UTF-8 when valid, Latin-1 otherwise.
pub fn decode_header_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_and_filename() {
        let value = r#"form-data; name="file"; filename="test.txt""#;
        let params = value.get_header_child();
        assert_eq!(value.get_header_type(), "form-data");
        assert_eq!(params.get("name"), Some(&"file"));
        assert_eq!(params.get("filename"), Some(&"test.txt"));
    }

    #[test]
    fn name_is_not_confused_with_filename() {
        let value = r#"form-data; filename="a.bin"; name="upload""#;
        let params = value.get_header_child();
        assert_eq!(params.get("name"), Some(&"upload"));
        assert_eq!(params.get("filename"), Some(&"a.bin"));
    }

    #[test]
    fn parameter_names_are_case_insensitive() {
        let params = r#"form-data; Name="f"; FileName="x""#.get_header_child();
        assert_eq!(params.get("name"), Some(&"f"));
        assert_eq!(params.get("filename"), Some(&"x"));
    }

    #[test]
    fn escaped_quotes_are_kept_verbatim() {
        let params = r#"form-data; name="f"; filename="say \"hi\".txt""#.get_header_child();
        assert_eq!(params.get("filename"), Some(&r#"say \"hi\".txt"#));
    }

    #[test]
    fn unquoted_parameters_are_ignored() {
        let params = "form-data; name=bare".get_header_child();
        assert!(params.get("name").is_none());
    }

    #[test]
    fn latin1_fallback_for_invalid_utf8() {
        assert_eq!(decode_header_text(b"caf\xe9"), "café");
        assert_eq!(decode_header_text("café".as_bytes()), "café");
    }
}
