/// Shared application state
use crate::dispatcher::Controller;
use cadence_playback::SessionRegistry;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            started_at: Utc::now(),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        self.controller.registry()
    }
}
