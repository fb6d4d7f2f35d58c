//! Streaming ingest of upload bodies
//!
//! The request body is capped before multipart parsing starts, and upload fields
//! are consumed as byte streams. Nothing here holds a whole upload in memory.

use std::io::{self, SeekFrom};
use std::path::Path;

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header::CONTENT_LENGTH, HeaderMap, StatusCode};
use futures::StreamExt;
use http_body_util::Limited;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tubely_core::constants::BYTES_PER_MB;
use tubely_core::AppError;

const TEMP_FILE_PREFIX: &str = "tubely-upload";

fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!(
        "Upload exceeds the maximum size of {} MB",
        max_bytes / BYTES_PER_MB
    ))
}

/// Classify a multipart read failure; a tripped body limit is `PayloadTooLarge`.
pub fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max_bytes)
    } else {
        AppError::MalformedRequest(format!("Failed to read multipart body: {}", err.body_text()))
    }
}

/// Reject a declared `Content-Length` above the cap without reading the body.
pub fn check_declared_length(headers: &HeaderMap, max_bytes: usize) -> Result<(), AppError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    match declared {
        Some(len) if len > max_bytes as u64 => Err(too_large(max_bytes)),
        _ => Ok(()),
    }
}

/// Cap the request body at `max_bytes` and start parsing it as multipart.
pub async fn open_multipart(request: Request, max_bytes: usize) -> Result<Multipart, AppError> {
    check_declared_length(request.headers(), max_bytes)?;

    let request = request.map(|body| Body::new(Limited::new(body, max_bytes)));

    Multipart::from_request(request, &())
        .await
        .map_err(|rejection| AppError::MalformedRequest(rejection.body_text()))
}

/// Adapt a multipart field into an `AsyncRead`.
///
/// Read failures surface to the consumer as `io::Error`; the first one is also
/// classified into `failure` so callers can report why the body stopped.
pub fn field_reader<'f>(
    field: Field<'f>,
    max_bytes: usize,
    failure: &'f mut Option<AppError>,
) -> impl AsyncRead + Send + Unpin + 'f {
    let stream = field.map(move |chunk| {
        chunk.map_err(|err| {
            let message = err.to_string();
            if failure.is_none() {
                *failure = Some(multipart_error(err, max_bytes));
            }
            io::Error::other(message)
        })
    });
    StreamReader::new(Box::pin(stream))
}

/// Temporary file holding one in-flight upload.
///
/// The file is unlinked when the buffer is dropped, whichever way the request ends.
pub struct IngestBuffer {
    file: File,
    path: TempPath,
}

impl IngestBuffer {
    /// Create a fresh, exclusively owned temp file in `dir`.
    pub fn create(dir: &Path, suffix: &str) -> Result<Self, AppError> {
        let named = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(suffix)
            .tempfile_in(dir)
            .map_err(|e| {
                AppError::StorageUnavailable(format!(
                    "Failed to create temp file in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        let (file, path) = named.into_parts();

        Ok(IngestBuffer {
            file: File::from_std(file),
            path,
        })
    }

    /// Drain `reader` into the file, flush, and rewind to the start.
    pub async fn fill(&mut self, reader: &mut (dyn AsyncRead + Send + Unpin)) -> io::Result<u64> {
        let written = tokio::io::copy(reader, &mut self.file).await?;
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(written)
    }

    /// The buffered contents, positioned at offset 0 after `fill`.
    pub fn reader(&mut self) -> &mut File {
        &mut self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
