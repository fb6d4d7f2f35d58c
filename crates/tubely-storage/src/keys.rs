//! Storage key generation.
//!
//! Key format: `{random}.{ext}` where `random` is 32 bytes from the OS CSPRNG in
//! URL-safe base64 without padding and `ext` is the subtype of the media type.
//! Client-supplied file names never contribute to the key.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::{OsRng, RngCore};
use thiserror::Error;
use tubely_core::validation::extension_for_media_type;
use tubely_core::AppError;

/// Number of random bytes behind every key.
pub const KEY_ENTROPY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("No file extension for media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid storage key: {0}")]
    Invalid(String),
}

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::EntropyUnavailable(msg) => AppError::EntropyUnavailable(msg),
            KeyError::UnsupportedMediaType(media_type) => AppError::UnsupportedMediaType(format!(
                "Unsupported media type: {}",
                media_type
            )),
            KeyError::Invalid(key) => AppError::Internal(format!("Invalid storage key: {}", key)),
        }
    }
}

/// A flat, collision-resistant object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Accept an existing key, rejecting anything that is not a flat file name.
    pub fn parse(key: impl Into<String>) -> Result<Self, KeyError> {
        let key = key.into();
        if !is_flat_name(&key) {
            return Err(KeyError::Invalid(key));
        }
        Ok(StorageKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_flat_name(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains("..")
        && !key.contains('/')
        && !key.contains('\\')
        && !key.contains('\0')
}

/// Generate a storage key for a validated media type using the OS CSPRNG.
pub fn generate_storage_key(content_type: &str) -> Result<StorageKey, KeyError> {
    generate_storage_key_with(&mut OsRng, content_type)
}

/// Generate a storage key drawing entropy from `rng`.
///
/// Fails with `EntropyUnavailable` if the source cannot fill the buffer; there
/// is no fallback to a weaker source.
pub fn generate_storage_key_with<R: RngCore + ?Sized>(
    rng: &mut R,
    content_type: &str,
) -> Result<StorageKey, KeyError> {
    let extension = extension_for_media_type(content_type)
        .ok_or_else(|| KeyError::UnsupportedMediaType(content_type.to_string()))?;

    let mut entropy = [0u8; KEY_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut entropy)
        .map_err(|e| KeyError::EntropyUnavailable(e.to_string()))?;

    let name = format!("{}.{}", URL_SAFE_NO_PAD.encode(entropy), extension);
    StorageKey::parse(name)
}
