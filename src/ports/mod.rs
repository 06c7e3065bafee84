//! Port traits defining external boundaries.
//!
//! `image_generator` is the server's boundary to the remote image provider;
//! `cover_api` is the session's boundary to the `/api/generate` endpoint.
//! Implementations live in `src/adapters/`.

pub mod cover_api;
pub mod image_generator;

pub use cover_api::{CoverApi, GenerationRequest};
pub use image_generator::{ImageGenerator, ImageRequest};
