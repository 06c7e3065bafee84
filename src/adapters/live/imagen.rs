//! Live adapter for the Imagen `:predict` REST endpoint.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;

use crate::error::CoverError;
use crate::ports::image_generator::{
    GenerateFuture, GeneratedImage, ImageGenerator, ImageRequest, ImageResponse,
};

/// Live Imagen generator talking to a Gemini-compatible endpoint.
pub struct ImagenGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ImagenGenerator {
    /// Create a generator for the given key and base URL
    /// (e.g. `https://generativelanguage.googleapis.com`).
    #[must_use]
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self { client: Client::new(), api_key, base_url: base_url.trim_end_matches('/').to_string() }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:predict", self.base_url)
    }
}

impl ImageGenerator for ImagenGenerator {
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = self.endpoint(&request.model);

            let body = serde_json::json!({
                "instances": [{ "prompt": request.prompt }],
                "parameters": {
                    "sampleCount": request.count,
                    "aspectRatio": request.aspect_ratio,
                }
            });

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if !status.is_success() {
                return Err(CoverError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            parse_predictions(&response_text)
        })
    }
}

/// Decode a successful `:predict` body. Filtered or missing predictions
/// yield an empty response rather than an error.
fn parse_predictions(body: &str) -> Result<ImageResponse, CoverError> {
    let parsed: PredictResponse = serde_json::from_str(body).map_err(|e| CoverError::Api {
        status: 200,
        message: format!("Failed to parse response: {e}"),
    })?;

    let mut images = Vec::new();
    for prediction in parsed.predictions {
        let Some(encoded) = prediction.bytes_base64_encoded else { continue };
        let data = base64::engine::general_purpose::STANDARD.decode(&encoded).map_err(|e| {
            CoverError::Api { status: 200, message: format!("Failed to decode base64: {e}") }
        })?;
        images.push(GeneratedImage {
            data,
            mime_type: prediction.mime_type.unwrap_or_else(|| "image/png".to_string()),
        });
    }
    Ok(ImageResponse { images })
}

/// Pull `error.message` out of a Google error envelope, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// --- Imagen API response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let generator = ImagenGenerator::new("k".into(), "https://proxy.example.com/");
        assert_eq!(
            generator.endpoint("imagen-4.0-generate-001"),
            "https://proxy.example.com/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }

    #[test]
    fn parses_predictions() {
        let body = r#"{"predictions":[{"bytesBase64Encoded":"iVBORw==","mimeType":"image/png"}]}"#;
        let response = parse_predictions(body).unwrap();
        assert_eq!(response.images.len(), 1);
        assert_eq!(response.images[0].data, vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(response.images[0].mime_type, "image/png");
    }

    #[test]
    fn filtered_response_has_no_images() {
        assert!(parse_predictions("{}").unwrap().images.is_empty());
        let body = r#"{"predictions":[{"raiFilteredReason":"blocked"}]}"#;
        assert!(parse_predictions(body).unwrap().images.is_empty());
    }

    #[test]
    fn bad_base64_is_an_api_error() {
        let body = r#"{"predictions":[{"bytesBase64Encoded":"***"}]}"#;
        assert!(matches!(parse_predictions(body), Err(CoverError::Api { status: 200, .. })));
    }

    #[test]
    fn error_message_from_envelope() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message("gateway timeout"), "gateway timeout");
    }
}
