//! HTTP API for the kitchen display
//!
//! This module provides a REST API over the cooking session:
//! - GET /recipes - Recipe selector contents
//! - POST /session/recipe - Switch recipe
//! - GET /session - Render pass (current step, ingredients, timers)
//! - POST /session/command - Handle a typed transcript
//! - POST /session/listen - Capture and handle a spoken command
//! - GET /images/* - Step images
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
