use std::{env::current_dir, path::PathBuf};

#[cfg(feature = "env")]
use std::str::FromStr;

pub mod error;
pub mod helpers;
pub mod multipart;
pub mod upload_store;

pub use error::{MalformedReason, MultipartError, UploadError};
pub use helpers::traits::http_request::{boundary_from_headers, parse_boundary, RequestUtils};
pub use helpers::traits::http_stream::{read_multipart_request, StreamMultipart};
pub use multipart::{
    parse_multipart, DecodedField, DecodedFile, DecodedPart, Form, MultipartDecoder, PartHeaders,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_PARTS,
};
pub use upload_store::{sanitize_filename, StoredFile, UploadStore};

pub mod external {
    pub use async_trait;
    #[cfg(feature = "env")]
    pub use dotenv;
    pub use http;
    pub use indexmap;
    pub use mime_guess;
    pub use tokio;
}

#[macro_export]
macro_rules! dev_print {
    ($($rest:tt)*) => {
        if cfg!(feature = "debug") {
            println!($($rest)*)
        }
    };
}

/// Default cap on a buffered request body (50MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Options {
    pub read_timeout_milliseconds: u64,
    pub read_buffer_size: usize,
    pub max_body_size: usize,
    pub max_parts: usize,
    pub max_file_size: usize,
    pub root_path: PathBuf,
    pub upload_dir: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    pub fn new() -> Options {
        let mut _options = Options {
            read_timeout_milliseconds: 3000,
            read_buffer_size: 4096,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_parts: DEFAULT_MAX_PARTS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            root_path: current_dir().unwrap_or_default(),
            upload_dir: PathBuf::from("uploads"),
        };

        #[cfg(feature = "env")]
        {
            use std::env;

            if let Ok(data) = env::var("READ_TIMEOUT_MILLISECONDS") {
                if let Ok(data) = data.parse::<u64>() {
                    _options.read_timeout_milliseconds = data;
                }
            }

            if let Ok(data) = env::var("READ_BUFFER_SIZE") {
                if let Ok(data) = data.parse::<usize>() {
                    _options.read_buffer_size = data;
                }
            }

            if let Ok(data) = env::var("MAX_BODY_SIZE") {
                if let Ok(data) = data.parse::<usize>() {
                    _options.max_body_size = data;
                }
            }

            if let Ok(data) = env::var("MAX_PARTS") {
                if let Ok(data) = data.parse::<usize>() {
                    _options.max_parts = data;
                }
            }

            if let Ok(data) = env::var("MAX_FILE_SIZE") {
                if let Ok(data) = data.parse::<usize>() {
                    _options.max_file_size = data;
                }
            }

            if let Ok(data) = env::var("ROOT_PATH") {
                if let Ok(path) = PathBuf::from_str(&data) {
                    _options.root_path = path;
                }
            }

            if let Ok(data) = env::var("UPLOAD_DIR") {
                if let Ok(path) = PathBuf::from_str(&data) {
                    _options.upload_dir = path;
                }
            }
        }

        _options
    }

    /// Decoder carrying this configuration's part and file limits.
    pub fn decoder(&self) -> MultipartDecoder {
        MultipartDecoder::new()
            .max_parts(self.max_parts)
            .max_file_size(self.max_file_size)
    }

    /// Directory uploads are written to: `upload_dir` resolved against `root_path`.
    pub fn upload_path(&self) -> PathBuf {
        self.root_path.join(&self.upload_dir)
    }
}

/// A fully buffered request body.
#[derive(Debug, Clone, Default)]
pub struct Body {
    pub bytes: Vec<u8>,
}

impl Body {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::new(bytes)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::new(bytes.to_vec())
    }
}
