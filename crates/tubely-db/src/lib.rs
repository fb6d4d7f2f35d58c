//! Video record repositories
//!
//! The upload pipeline reads a video record once to check ownership and writes it
//! back once to record a new media URL. `VideoRepository` is that capability;
//! `PgVideoRepository` backs it with Postgres and `InMemoryVideoRepository` with
//! a map, for tests and local tooling.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VideoRepository};
