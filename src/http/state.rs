use crate::session::Assistant;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The session driver; the mutex makes each request run to completion
    pub assistant: Arc<Mutex<Assistant>>,

    /// Signalled once the session is terminated by voice command
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(Mutex::new(assistant)),
            shutdown: Arc::new(Notify::new()),
        }
    }
}
