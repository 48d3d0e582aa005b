use super::state::AppState;
use crate::session::{Frame, ListenOutcome};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectRecipeRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Transcript text, as if it had been spoken
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct RecipesResponse {
    pub recipes: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn session_gone() -> Response {
    error_response(StatusCode::GONE, "Session has been terminated")
}

/// The final frame of a terminated session triggers server shutdown
fn notify_if_terminated(state: &AppState, frame: &Frame) {
    if frame.terminated {
        info!("Session terminated by voice command, shutting down");
        state.shutdown.notify_one();
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /recipes
/// List catalog recipes in selector order
pub async fn list_recipes(State(state): State<AppState>) -> impl IntoResponse {
    let assistant = state.assistant.lock().await;

    Json(RecipesResponse {
        recipes: assistant
            .catalog()
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
        selected: assistant.state().recipe().name.clone(),
    })
}

/// POST /session/recipe
/// Switch to another recipe
pub async fn select_recipe(
    State(state): State<AppState>,
    Json(req): Json<SelectRecipeRequest>,
) -> impl IntoResponse {
    let mut assistant = state.assistant.lock().await;

    if assistant.is_terminated() {
        return session_gone();
    }

    match assistant.select_recipe(&req.name) {
        Ok(frame) => (StatusCode::OK, Json(frame)).into_response(),
        Err(e) => {
            warn!("Failed to select recipe: {}", e);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

/// GET /session
/// Render pass: current step, ingredients and timer status
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    let mut assistant = state.assistant.lock().await;

    if assistant.is_terminated() {
        return session_gone();
    }

    (StatusCode::OK, Json(assistant.render())).into_response()
}

/// POST /session/command
/// Handle a transcript without capturing audio
pub async fn post_command(
    State(state): State<AppState>,
    Json(req): Json<CommandRequest>,
) -> impl IntoResponse {
    let mut assistant = state.assistant.lock().await;

    if assistant.is_terminated() {
        return session_gone();
    }

    let outcome = assistant.handle_transcript(&req.transcript);
    notify_if_terminated(&state, &outcome.frame);

    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST /session/listen
/// Capture one spoken command and handle it
pub async fn listen(State(state): State<AppState>) -> impl IntoResponse {
    let mut assistant = state.assistant.lock().await;

    if assistant.is_terminated() {
        return session_gone();
    }

    let outcome = assistant.listen().await;
    if let ListenOutcome::Heard(command) = &outcome {
        notify_if_terminated(&state, &command.frame);
    }

    (StatusCode::OK, Json(outcome)).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
