//! Adapters that talk to real network services.

pub mod cover_api;
pub mod imagen;
