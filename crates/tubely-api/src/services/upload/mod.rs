//! Upload pipeline
//!
//! `UploadService` drives one upload from the raw request to the updated video
//! record; `ingest` holds the body-limiting and temp-file plumbing it uses.

pub mod ingest;
mod service;

pub use ingest::IngestBuffer;
pub use service::UploadService;
