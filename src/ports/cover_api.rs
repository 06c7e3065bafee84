//! Cover API port: the session's view of `POST /api/generate`.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Deserializer, Serialize};

use crate::params::Mode;

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// User prompt. Required and non-empty; absent or `null` deserializes as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    /// Extra terms to avoid, appended after the baseline negative prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Aspect ratio; the composer falls back to `9:16`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Requested resolution. Accepted but not forwarded to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Style hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Generation mode; absent or `null` means image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: Mode,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Success body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Always `true`.
    pub success: bool,
    /// `data:image/png;base64,...` URI.
    pub image: String,
}

/// Boxed future returned by [`CoverApi::generate`].
///
/// Resolves to the image data URI, or to a message fit for the error banner.
pub type CoverFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// Submits generation requests on behalf of a session.
pub trait CoverApi: Send + Sync {
    /// Submit one request.
    fn generate(&self, request: &GenerationRequest) -> CoverFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_on_the_wire() {
        let request = GenerationRequest {
            prompt: "金色祥云".into(),
            negative_prompt: Some("dark".into()),
            aspect_ratio: Some("9:16".into()),
            mode: Mode::Avatar,
            ..GenerationRequest::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["negativePrompt"], "dark");
        assert_eq!(json["aspectRatio"], "9:16");
        assert_eq!(json["mode"], "avatar");
        assert!(json.get("style").is_none());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let request: GenerationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.prompt.is_empty());
        assert_eq!(request.mode, Mode::Image);
        assert!(request.aspect_ratio.is_none());
    }

    #[test]
    fn null_fields_take_defaults() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"prompt":null,"mode":null,"style":null,"negativePrompt":null}"#,
        )
        .unwrap();
        assert!(request.prompt.is_empty());
        assert_eq!(request.mode, Mode::Image);
        assert!(request.style.is_none());
        assert!(request.negative_prompt.is_none());
    }
}
