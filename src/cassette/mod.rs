//! Record/replay of provider interactions for offline runs and tests.
//!
//! A cassette is a YAML file holding an ordered list of interactions, each
//! tagged with the port and method that produced it.

pub mod recorder;
pub mod replayer;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Port tag of provider image calls.
pub const IMAGE_GENERATOR_PORT: &str = "image_generator";
/// Method tag of provider image calls.
pub const GENERATE_METHOD: &str = "generate";

/// A recorded session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Source revision the recording was made from.
    pub commit: String,
    /// Interactions in call order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number within the cassette.
    pub seq: u64,
    /// Port name, e.g. `image_generator`.
    pub port: String,
    /// Method name, e.g. `generate`.
    pub method: String,
    /// Summary of the call input; not used when replaying.
    #[serde(default)]
    pub input: serde_json::Value,
    /// Serialized result using the `Ok` / `Err` convention.
    pub output: serde_json::Value,
}

/// Read and parse a cassette file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<Cassette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_hand_written_cassette() {
        let dir = std::env::temp_dir().join("redcover_cassette_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cover.cassette.yaml");
        std::fs::write(
            &path,
            "name: cover\nrecorded_at: \"2026-01-20T08:00:00Z\"\ncommit: test\ninteractions:\n  - seq: 0\n    port: image_generator\n    method: generate\n    output:\n      Ok:\n        images: []\n",
        )
        .unwrap();

        let cassette = load_cassette(&path).unwrap();
        assert_eq!(cassette.name, "cover");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].port, "image_generator");
        assert!(cassette.interactions[0].input.is_null());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }
}
