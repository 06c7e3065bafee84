//! HTTP surface: `POST /api/generate`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::CoverError;
use crate::ports::cover_api::GenerationResponse;
use crate::ports::{GenerationRequest, ImageGenerator, ImageRequest};
use crate::prompt::{compose_prompt, effective_aspect_ratio};

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Provider the composer forwards to.
    pub generator: Arc<dyn ImageGenerator>,
    /// Provider model identifier.
    pub model: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new().route("/api/generate", post(generate_handler)).with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), CoverError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, model = %state.model, "listening");
    }
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, CoverError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected malformed request body");
        CoverError::Validation(rejection.body_text())
    })?;

    let image = generate_cover(state.generator.as_ref(), &state.model, &request).await?;
    Ok(Json(GenerationResponse { success: true, image }))
}

/// Compose the prompt, call the provider once and wrap the first image as a
/// PNG data URI.
///
/// # Errors
///
/// - [`CoverError::Validation`] for an empty prompt
/// - [`CoverError::NoImage`] when the provider returns no image bytes
/// - any provider or network error, unchanged
pub async fn generate_cover(
    generator: &dyn ImageGenerator,
    model: &str,
    request: &GenerationRequest,
) -> Result<String, CoverError> {
    debug!(
        prompt_len = request.prompt.chars().count(),
        mode = %request.mode,
        aspect_ratio = ?request.aspect_ratio,
        resolution = ?request.resolution,
        "generation request received"
    );

    let prompt = compose_prompt(request).inspect_err(|e| warn!(error = %e, "validation failed"))?;

    // The provider owns the set of valid ratios; its rejection surfaces as a 500.
    let image_request = ImageRequest {
        model: model.to_string(),
        prompt,
        aspect_ratio: effective_aspect_ratio(request).to_string(),
        count: 1,
    };

    let started_at = Instant::now();
    let response = generator.generate(&image_request).await.inspect_err(|e| {
        error!(error = %e, "image generation failed");
    })?;

    let Some(image) = response.images.into_iter().next().filter(|i| !i.data.is_empty()) else {
        error!("provider returned no image");
        return Err(CoverError::NoImage);
    };

    info!(
        bytes = image.data.len(),
        mode = %request.mode,
        latency_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        "image generated"
    );
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.data);
    Ok(format!("data:image/png;base64,{encoded}"))
}
