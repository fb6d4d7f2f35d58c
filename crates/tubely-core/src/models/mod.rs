//! Data models for the application
//!
//! The video record and its client-facing projection, plus the upload kinds the
//! pipeline accepts.

mod upload;
mod video;

pub use upload::*;
pub use video::*;
