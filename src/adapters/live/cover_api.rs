//! Live adapter for the `/api/generate` endpoint of a running server.

use reqwest::Client;
use serde::Deserialize;

use crate::ports::cover_api::{CoverApi, CoverFuture, GenerationRequest};

const FALLBACK_MESSAGE: &str = "Failed to generate image";

/// HTTP client for `POST /api/generate`.
pub struct HttpCoverApi {
    client: Client,
    endpoint: String,
}

impl HttpCoverApi {
    /// Create a client for the server at `server_url` (e.g. `http://127.0.0.1:3000`).
    #[must_use]
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/generate", server_url.trim_end_matches('/')),
        }
    }
}

impl CoverApi for HttpCoverApi {
    fn generate(&self, request: &GenerationRequest) -> CoverFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let transport_failure = |e: reqwest::Error| {
                let message = e.to_string();
                if message.is_empty() {
                    format!("Failed to generate {}. Please try again.", request.mode)
                } else {
                    message
                }
            };

            let response = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(transport_failure)?;

            let status = response.status();
            let text = response.text().await.map_err(transport_failure)?;
            interpret_response(status.is_success(), &text)
        })
    }
}

/// Turn an endpoint reply into a data URI or a banner message.
fn interpret_response(ok: bool, body: &str) -> Result<String, String> {
    let parsed: ReplyBody = serde_json::from_str(body).unwrap_or_default();
    if !ok {
        return Err(parsed.error.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()));
    }
    parsed.image.ok_or_else(|| "No image generated".to_string())
}

#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    image: Option<String>,
    error: Option<String>,
}
