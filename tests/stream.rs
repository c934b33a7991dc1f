use std::time::Duration;

use http::Request;
use multipart_form::{
    read_multipart_request, MultipartError, Options, StreamMultipart, UploadError,
};
use tokio::io::AsyncWriteExt;

fn sample_body(boundary: &str) -> Vec<u8> {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"field1\"\r\n\r\n\
         value1\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"test.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         Hello World\r\n\
         --{b}--\r\n",
        b = boundary
    )
    .into_bytes()
}

fn small_reads() -> Options {
    let mut options = Options::new();
    options.read_buffer_size = 7;
    options
}

#[tokio::test]
async fn reads_stream_in_small_chunks() {
    let body = sample_body("chunky");
    let mut reader: &[u8] = &body;

    let form = reader.read_multipart("chunky", &small_reads()).await.unwrap();

    assert_eq!(form.field("field1"), Some("value1"));
    assert_eq!(form.files()[0].content, b"Hello World");
}

#[tokio::test]
async fn body_is_delivered_over_a_pipe() {
    let body = sample_body("pipe");
    let (mut client, mut server) = tokio::io::duplex(16);

    let writer = tokio::spawn(async move {
        for chunk in body.chunks(5) {
            client.write_all(chunk).await.unwrap();
        }
        client.shutdown().await.unwrap();
    });

    let form = server.read_multipart("pipe", &Options::new()).await.unwrap();
    writer.await.unwrap();

    assert_eq!(form.len(), 2);
}

#[tokio::test]
async fn body_over_limit_is_rejected() {
    let body = sample_body("big");
    let mut options = small_reads();
    options.max_body_size = 32;
    let mut reader: &[u8] = &body;

    let result = reader.read_body(&options).await;
    assert!(matches!(
        result,
        Err(UploadError::BodyTooLarge { max: 32, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn stalled_stream_times_out() {
    let (_client, mut server) = tokio::io::duplex(16);
    let mut options = Options::new();
    options.read_timeout_milliseconds = 50;

    let result = server.read_body(&options).await;
    assert!(matches!(result, Err(UploadError::Timeout(50))));
}

#[tokio::test]
async fn decode_errors_surface_through_the_reader() {
    let mut reader: &[u8] = b"--b\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n";
    let result = reader.read_multipart("b", &Options::new()).await;
    assert!(matches!(
        result,
        Err(UploadError::Multipart(MultipartError::NoTerminalMarker))
    ));
}

#[tokio::test]
async fn request_stream_uses_headers() {
    let body = sample_body("req");
    let request = Request::builder()
        .header("content-type", "multipart/form-data; boundary=req")
        .header("content-length", body.len().to_string())
        .body(&body[..])
        .unwrap();

    let form = read_multipart_request(request, &small_reads()).await.unwrap();
    assert_eq!(form.field("field1"), Some("value1"));
}

#[tokio::test]
async fn request_stream_stops_at_content_length() {
    let mut body = sample_body("req");
    let declared = body.len();
    body.extend_from_slice(b"trailing bytes from the next request");
    let request = Request::builder()
        .header("content-type", "multipart/form-data; boundary=req")
        .header("content-length", declared.to_string())
        .body(&body[..])
        .unwrap();

    let form = read_multipart_request(request, &Options::new()).await.unwrap();
    assert_eq!(form.files()[0].content, b"Hello World");
}

#[tokio::test]
async fn short_body_is_an_io_error() {
    let body = sample_body("req");
    let request = Request::builder()
        .header("content-type", "multipart/form-data; boundary=req")
        .header("content-length", (body.len() + 10).to_string())
        .body(&body[..])
        .unwrap();

    let result = read_multipart_request(request, &Options::new()).await;
    assert!(matches!(result, Err(UploadError::Io(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof));
}

#[tokio::test]
async fn boundary_is_checked_before_reading() {
    let (_client, server) = tokio::io::duplex(16);
    let request = Request::builder()
        .header("content-type", "application/json")
        .body(server)
        .unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(1),
        read_multipart_request(request, &Options::new()),
    )
    .await
    .expect("should fail without waiting for the body");
    assert!(matches!(
        result,
        Err(UploadError::Multipart(MultipartError::InvalidContentType(_)))
    ));
}
