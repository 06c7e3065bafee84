//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

/// Decode a replayed output written with the `Ok` / `Err` convention.
///
/// # Errors
///
/// Returns the recorded `Err` message, or a description of why the output
/// could not be decoded.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, String> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(err_val.as_str().unwrap_or("replayed error").to_string());
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(ok_val).map_err(|e| format!("Malformed replayed output: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_generator::ImageResponse;
    use serde_json::json;

    #[test]
    fn err_output_becomes_message() {
        let result = replay_result::<ImageResponse>(json!({ "Err": "API error (403): denied" }));
        assert_eq!(result.unwrap_err(), "API error (403): denied");
    }

    #[test]
    fn ok_output_is_decoded() {
        let response: ImageResponse =
            replay_result(json!({ "Ok": { "images": [{ "data": "AQID", "mime_type": "image/png" }] } }))
                .unwrap();
        assert_eq!(response.images[0].data, vec![1, 2, 3]);
    }

    #[test]
    fn bare_output_is_decoded() {
        let response: ImageResponse = replay_result(json!({ "images": [] })).unwrap();
        assert!(response.images.is_empty());
    }
}
