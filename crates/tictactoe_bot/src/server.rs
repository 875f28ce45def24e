//! HTTP endpoint receiving Discord interactions.

use crate::dispatcher::Dispatcher;
use crate::interaction::Interaction;
use crate::verify::SignatureVerifier;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Path Discord posts interactions to.
pub const INTERACTIONS_PATH: &str = "/discord-interactions";

/// Shared handler state.
#[derive(Debug)]
struct AppState {
    verifier: SignatureVerifier,
    dispatcher: Dispatcher,
}

/// Builds the interactions router.
#[instrument(skip_all)]
pub fn router(verifier: SignatureVerifier, dispatcher: Dispatcher) -> Router {
    info!(path = INTERACTIONS_PATH, "Building interactions router");
    let state = Arc::new(AppState {
        verifier,
        dispatcher,
    });
    Router::new()
        .route(INTERACTIONS_PATH, post(interactions))
        .with_state(state)
}

/// Verifies, parses and dispatches one interaction.
#[instrument(skip_all, fields(bytes = body.len()))]
async fn interactions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(e) = state.verifier.verify(&headers, &body) {
        warn!(error = %e, "Rejecting unsigned request");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction = match Interaction::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            warn!(error = %e, "Malformed interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction").into_response();
        }
    };

    match state.dispatcher.dispatch(&interaction) {
        Ok(response) => Json(response).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}
