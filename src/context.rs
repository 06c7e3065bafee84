//! Chooses the provider adapter (live / recording / replaying) for `serve`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::imagen::ImagenGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::error::CoverError;
use crate::ports::ImageGenerator;

/// The provider the server forwards to.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Arc<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after the server stops.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the recorded cassette to disk. `None` if no provider call was made.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorder is still shared or the file cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Live context calling the configured provider.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn live(config: &Config) -> Result<Self, CoverError> {
        let generator = live_generator(config)?;
        Ok(Self { generator: Arc::from(generator) })
    }

    /// Live context whose provider calls are also recorded to a cassette
    /// under `.redcover/cassettes/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), CoverError> {
        let live = live_generator(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".redcover/cassettes")
            .join(&timestamp)
            .join("image_generator.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_generator"),
            commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live, Arc::clone(&recorder));
        Ok((Self { generator: Arc::new(generator) }, RecordingSession { recorder }))
    }

    /// Offline context serving provider results from a cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, CoverError> {
        let cassette = load_cassette(path)
            .map_err(|e| CoverError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingImageGenerator::new(CassetteReplayer::new(cassette));
        Ok(Self { generator: Arc::new(generator) })
    }
}

fn live_generator(config: &Config) -> Result<Box<dyn ImageGenerator>, CoverError> {
    let key = config.api_key().ok_or(CoverError::MissingApiKey {
        provider: "Gemini".into(),
        env_var: "GEMINI_API_KEY".into(),
    })?;
    Ok(Box::new(ImagenGenerator::new(key, &config.base_url())))
}

fn commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
