//! Tubely Storage Library
//!
//! Storage abstraction for uploaded media plus its two implementations: the local
//! filesystem backend that holds thumbnails and the S3 backend that holds videos.
//!
//! # Storage key format
//!
//! Keys are flat file names: 32 random bytes in URL-safe base64 without padding,
//! a dot, and the subtype of the declared media type (`<random>.png`,
//! `<random>.mp4`). Keys never contain `/` or `..`; key generation is centralized
//! in the `keys` module so both backends see the same shape.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_storage_key, KeyError, StorageKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
