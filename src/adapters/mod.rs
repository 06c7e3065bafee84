//! Adapter implementations for port traits.
//!
//! - `live/`: real HTTP implementations
//! - `recording/`: wrap a live provider and record its results to a cassette
//! - `replaying/`: serve provider results from a cassette

pub mod live;
pub mod recording;
pub mod replaying;
