//! Redcover - red envelope cover generation.
//!
//! Two halves share this crate:
//! - the server side ([`server`], [`prompt`]) composes provider prompts and
//!   answers `POST /api/generate`;
//! - the client side ([`session`]) holds one user's generation session and
//!   drives requests against that endpoint.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod params;
pub mod ports;
pub mod prompt;
pub mod server;
pub mod session;
