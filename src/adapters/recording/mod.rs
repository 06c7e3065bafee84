//! Recording adapters that capture provider calls to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use crate::cassette::recorder::CassetteRecorder;
use crate::error::CoverError;
use crate::ports::image_generator::{ImageRequest, ImageResponse};

/// Record a provider outcome using the `Ok` / `Err` JSON convention.
///
/// Recording never fails the call it observes; problems are logged.
pub(crate) fn record_outcome(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    request: &ImageRequest,
    result: &Result<ImageResponse, CoverError>,
) {
    let output = match result {
        Ok(response) => match serde_json::to_value(response) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unserializable provider response");
                return;
            }
        },
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record_generation(request, output),
        Err(e) => tracing::warn!(error = %e, "recorder lock poisoned"),
    }
}
