//! Image generator port for the remote image-generation provider.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::CoverError;

/// A request to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Provider model identifier (e.g., `"imagen-4.0-generate-001"`).
    pub model: String,
    /// Fully composed prompt text.
    pub prompt: String,
    /// Aspect ratio (e.g., `"9:16"`).
    pub aspect_ratio: String,
    /// Number of images to generate.
    pub count: u32,
}

/// A single generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Raw image bytes (decoded from base64).
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type reported by the provider (e.g., `"image/png"`).
    pub mime_type: String,
}

/// Provider response. May legitimately carry zero images, e.g. when every
/// candidate was filtered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageResponse {
    /// The generated images.
    pub images: Vec<GeneratedImage>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImageResponse, CoverError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for the given request.
    fn generate(&self, request: &ImageRequest) -> GenerateFuture<'_>;
}

/// Stores `Vec<u8>` as base64 text so cassettes stay YAML-friendly.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_image_stores_bytes_as_base64() {
        let image = GeneratedImage { data: vec![0x89, 0x50, 0x4E, 0x47], mime_type: "image/png".into() };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "iVBORw==");
        assert_eq!(json["mime_type"], "image/png");
    }

    #[test]
    fn empty_response_deserializes() {
        let response: ImageResponse = serde_json::from_str(r#"{"images": []}"#).unwrap();
        assert!(response.images.is_empty());
    }
}
