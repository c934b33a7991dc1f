use async_trait::async_trait;
use http::header::CONTENT_LENGTH;
use http::Request;
use std::time::Duration;
use tokio::io::{self, AsyncRead, AsyncReadExt};

use crate::dev_print;
use crate::error::UploadError;
use crate::helpers::traits::http_request::boundary_from_headers;
use crate::multipart::Form;
use crate::Options;

/// Buffers an async byte stream and decodes it once end-of-stream is reached.
#[async_trait]
pub trait StreamMultipart {
    async fn read_body(&mut self, options: &Options) -> Result<Vec<u8>, UploadError>;
    async fn read_multipart(
        &mut self,
        boundary: &str,
        options: &Options,
    ) -> Result<Form, UploadError>;
}

#[async_trait]
impl<R> StreamMultipart for R
where
    R: AsyncRead + Unpin + Send + ?Sized,
{
    async fn read_body(&mut self, options: &Options) -> Result<Vec<u8>, UploadError> {
        get_bytes_from_reader(self, options, None).await
    }

    async fn read_multipart(
        &mut self,
        boundary: &str,
        options: &Options,
    ) -> Result<Form, UploadError> {
        let bytes = self.read_body(options).await?;
        Ok(options.decoder().decode(&bytes, boundary)?)
    }
}

/// Decodes a request whose body is still a stream.
///
/// The boundary is taken from the request headers before any body byte is read,
/// and `Content-Length`, when present, bounds the read.
pub async fn read_multipart_request<R>(
    request: Request<R>,
    options: &Options,
) -> Result<Form, UploadError>
where
    R: AsyncRead + Unpin + Send,
{
    let boundary = boundary_from_headers(request.headers())?;
    let content_length = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<usize>().ok());

    let (_, mut body) = request.into_parts();
    let bytes = get_bytes_from_reader(&mut body, options, content_length).await?;
    Ok(options.decoder().decode(&bytes, &boundary)?)
}

async fn get_bytes_from_reader<R>(
    stream: &mut R,
    options: &Options,
    content_length: Option<usize>,
) -> Result<Vec<u8>, UploadError>
where
    R: AsyncRead + Unpin + Send + ?Sized,
{
    if let Some(length) = content_length {
        if length > options.max_body_size {
            return Err(UploadError::BodyTooLarge {
                size: length,
                max: options.max_body_size,
            });
        }
    }

    let mut bytes: Vec<u8> = Vec::with_capacity(content_length.unwrap_or_default());
    let mut buf = vec![0; options.read_buffer_size.max(1)];

    loop {
        let n = match read_with_timeout(stream, &mut buf, options).await {
            Ok(n) => n,
            Err(UploadError::Io(ref e)) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..n]);

        if bytes.len() > options.max_body_size {
            return Err(UploadError::BodyTooLarge {
                size: bytes.len(),
                max: options.max_body_size,
            });
        }
        if let Some(length) = content_length {
            if bytes.len() >= length {
                bytes.truncate(length);
                break;
            }
        }
    }

    if let Some(length) = content_length {
        if bytes.len() < length {
            dev_print!("body ended at {} of {} bytes", bytes.len(), length);
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("body ended at {} of {} bytes", bytes.len(), length),
            )
            .into());
        }
    }

    dev_print!("bytes len: {:?}", &bytes.len());
    Ok(bytes)
}

// A zero timeout waits forever.
async fn read_with_timeout<R>(
    stream: &mut R,
    buf: &mut [u8],
    options: &Options,
) -> Result<usize, UploadError>
where
    R: AsyncRead + Unpin + Send + ?Sized,
{
    if options.read_timeout_milliseconds == 0 {
        return Ok(stream.read(buf).await?);
    }

    let timeout = Duration::from_millis(options.read_timeout_milliseconds);
    match tokio::time::timeout(timeout, stream.read(buf)).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            dev_print!("read timed out after {}ms", options.read_timeout_milliseconds);
            Err(UploadError::Timeout(options.read_timeout_milliseconds))
        }
    }
}
