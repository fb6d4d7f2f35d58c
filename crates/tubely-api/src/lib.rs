//! Tubely API Library
//!
//! This crate provides the HTTP handlers for media uploads, the upload pipeline
//! behind them, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, UploadStorage};
