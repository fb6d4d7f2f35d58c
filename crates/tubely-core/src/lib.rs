//! Tubely Core Library
//!
//! Domain models, error types, configuration and media-type validation shared by
//! the storage, database and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{UploadKind, Video, VideoResponse};
pub use storage_types::StorageBackend;
