//! Replaying adapter for the `ImageGenerator` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::{GENERATE_METHOD, IMAGE_GENERATOR_PORT};
use crate::error::CoverError;
use crate::ports::image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResponse};

/// Serves recorded provider results instead of calling the network.
pub struct ReplayingImageGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingImageGenerator {
    /// Create a replaying generator backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_output(&self) -> Result<serde_json::Value, CoverError> {
        let mut guard =
            self.replayer.lock().map_err(|e| CoverError::Replay(format!("replayer lock poisoned: {e}")))?;
        guard.next_output(IMAGE_GENERATOR_PORT, GENERATE_METHOD).map_err(CoverError::Replay)
    }
}

impl ImageGenerator for ReplayingImageGenerator {
    fn generate(&self, _request: &ImageRequest) -> GenerateFuture<'_> {
        let output = self.next_output();
        Box::pin(async move {
            // Recorded provider failures replay as the provider error they were.
            replay_result::<ImageResponse>(output?)
                .map_err(|message| CoverError::Api { status: 0, message })
        })
    }
}
