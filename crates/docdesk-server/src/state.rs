//! Shared application state for the `docdesk` server.
//!
//! A single [`AppState`] is built at startup and shared across all Axum
//! handlers via `Arc`.

use std::sync::Arc;

use docdesk_store::DocumentGateway;

use crate::session::SessionRegistry;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Identity and document service client, shared by every session.
    pub gateway: Arc<dyn DocumentGateway>,
    /// Live browser sessions.
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            gateway,
            sessions: SessionRegistry::new(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
