//! Test fixtures: minimal PNG and MP4 blobs plus multipart builders.

use axum::body::Body;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use futures::stream;

/// Boundary used by `chunked_multipart_body`.
pub const BOUNDARY: &str = "tubely-test-boundary";

/// Minimal valid 1x1 PNG bytes.
pub fn create_minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// MP4-looking payload of exactly `size` bytes: an `ftyp` box followed by filler.
pub fn create_test_mp4(size: usize) -> Vec<u8> {
    let mut mp4 = Vec::with_capacity(size);
    mp4.extend_from_slice(&[0x00, 0x00, 0x00, 0x18]);
    mp4.extend_from_slice(b"ftypisom");
    mp4.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    mp4.extend_from_slice(b"isomiso2");
    mp4.extend((0..size.saturating_sub(mp4.len())).map(|i| (i % 251) as u8));
    mp4.truncate(size);
    mp4
}

/// Single-part form carrying `data` under `field` with the given content type.
pub fn media_form(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn thumbnail_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    media_form("thumbnail", data, "thumbnail.png", mime_type)
}

pub fn video_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    media_form("video", data, "boots.mp4", mime_type)
}

/// Single-part multipart body of `size` payload bytes, streamed in 64 KiB chunks.
///
/// The body has no known length, so the request carries no `Content-Length`.
pub fn chunked_multipart_body(field: &str, file_name: &str, mime_type: &str, size: usize) -> Body {
    const CHUNK: usize = 64 * 1024;

    let mut chunks = vec![Bytes::from(format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
         Content-Type: {}\r\n\r\n",
        BOUNDARY, field, file_name, mime_type
    ))];
    let mut remaining = size;
    while remaining > 0 {
        let n = remaining.min(CHUNK);
        chunks.push(Bytes::from(vec![0x42u8; n]));
        remaining -= n;
    }
    chunks.push(Bytes::from(format!("\r\n--{}--\r\n", BOUNDARY)));

    Body::from_stream(stream::iter(
        chunks.into_iter().map(Ok::<_, std::io::Error>),
    ))
}
