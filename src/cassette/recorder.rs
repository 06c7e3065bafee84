//! Accumulates provider calls made by a serving session.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::json;

use super::{Cassette, Interaction, GENERATE_METHOD, IMAGE_GENERATOR_PORT};
use crate::ports::ImageRequest;
use crate::prompt::user_section;

/// Collects provider calls until [`CassetteRecorder::finish`] writes the YAML file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self { path: path.into(), name: name.into(), commit: commit.into(), interactions: Vec::new() }
    }

    /// Record one provider call and its `Ok`/`Err` outcome.
    ///
    /// The composed prompt is stored without the fixed directive and
    /// negative-prompt text, which every call repeats.
    pub fn record_generation(&mut self, request: &ImageRequest, output: serde_json::Value) {
        let input = json!({
            "model": request.model,
            "aspect_ratio": request.aspect_ratio,
            "count": request.count,
            "request": user_section(&request.prompt),
        });
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: IMAGE_GENERATOR_PORT.to_string(),
            method: GENERATE_METHOD.to_string(),
            input,
            output,
        });
    }

    /// Number of calls recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Write the cassette to disk, creating parent directories as needed.
    /// A session that made no provider calls writes nothing and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, std::io::Error> {
        if self.interactions.is_empty() {
            return Ok(None);
        }
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(Some(self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::load_cassette;
    use crate::params::Mode;
    use crate::ports::GenerationRequest;
    use crate::prompt::compose_prompt;

    fn provider_request(prompt: &str, mode: Mode) -> ImageRequest {
        let request = GenerationRequest { prompt: prompt.into(), mode, ..GenerationRequest::default() };
        ImageRequest {
            model: "imagen-4.0-generate-001".into(),
            prompt: compose_prompt(&request).unwrap(),
            aspect_ratio: "9:16".into(),
            count: 1,
        }
    }

    #[test]
    fn finish_writes_compact_loadable_cassette() {
        let dir = std::env::temp_dir().join("redcover_recorder_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/cover.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "cover-session", "deadbeef");
        recorder.record_generation(&provider_request("金色祥云", Mode::Image), json!({"Err": "quota"}));
        recorder.record_generation(&provider_request("鲤鱼", Mode::Avatar), json!({"Ok": {"images": []}}));
        assert_eq!(recorder.len(), 2);

        let written = recorder.finish().unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let cassette = load_cassette(&path).unwrap();
        assert_eq!(cassette.name, "cover-session");
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[0].input["request"], "金色祥云");
        assert_eq!(cassette.interactions[0].input["aspect_ratio"], "9:16");
        let avatar = cassette.interactions[1].input["request"].as_str().unwrap();
        assert!(avatar.starts_with("鲤鱼\n"));
        assert!(!avatar.contains("Avoid:"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn idle_session_writes_nothing() {
        let path = std::env::temp_dir().join("redcover_recorder_idle/none.cassette.yaml");
        let _ = std::fs::remove_file(&path);
        let recorder = CassetteRecorder::new(&path, "idle", "deadbeef");
        assert!(recorder.finish().unwrap().is_none());
        assert!(!path.exists());
    }
}
