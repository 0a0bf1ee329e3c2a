//! Per-browser panel sessions.
//!
//! Every browser gets one [`PanelSession`], found through the
//! `docdesk_session` cookie. The session middleware resolves (or creates) it
//! and injects a [`SessionHandle`] into the request extensions. Handlers lock
//! the handle for the whole action, so each session has a single writer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use docdesk_core::form::FormModel;
use docdesk_core::Controller;
use docdesk_store::DocumentGateway;

use crate::state::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "docdesk_session";

/// Severity of a one-shot notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// A notice shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Everything one browser's panel remembers between requests.
#[derive(Debug)]
pub struct PanelSession {
    pub controller: Controller<dyn DocumentGateway>,
    /// Add or edit form currently on screen.
    pub open_form: Option<FormModel>,
    pub flash: Option<Flash>,
}

impl PanelSession {
    fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            controller: Controller::new(gateway),
            open_form: None,
            flash: None,
        }
    }
}

/// Handle to a locked-on-demand session, injected by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: String,
    inner: Arc<Mutex<PanelSession>>,
}

impl SessionHandle {
    pub async fn lock(&self) -> MutexGuard<'_, PanelSession> {
        self.inner.lock().await
    }
}

struct Entry {
    session: Arc<Mutex<PanelSession>>,
    last_seen: Instant,
}

/// All live sessions keyed by cookie id.
#[derive(Default)]
pub struct SessionRegistry {
    entries: RwLock<HashMap<String, Entry>>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry").finish_non_exhaustive()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the session for `presented`, or start a fresh one.
    ///
    /// Unknown ids are never adopted: a new session always gets a new id.
    /// The second value is `true` when a session was created.
    pub async fn resolve(
        &self,
        presented: Option<&str>,
        gateway: &Arc<dyn DocumentGateway>,
    ) -> (SessionHandle, bool) {
        let mut entries = self.entries.write().await;

        if let Some(id) = presented {
            if let Some(entry) = entries.get_mut(id) {
                entry.last_seen = Instant::now();
                return (
                    SessionHandle {
                        id: id.to_owned(),
                        inner: Arc::clone(&entry.session),
                    },
                    false,
                );
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(PanelSession::new(Arc::clone(gateway))));
        entries.insert(
            id.clone(),
            Entry {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        debug!(live = entries.len(), "panel session created");
        (
            SessionHandle { id, inner: session },
            true,
        )
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.entries.write().await.remove(id).is_some()
    }

    /// Drop sessions unused for longer than `max_idle`. Returns how many.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before.saturating_sub(entries.len())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Middleware that attaches the caller's [`SessionHandle`].
///
/// Sets the session cookie on the response when a session was created.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = cookie_value(req.headers(), SESSION_COOKIE);
    let (handle, created) = state
        .sessions
        .resolve(presented.as_deref(), &state.gateway)
        .await;
    let id = handle.id.clone();
    req.extensions_mut().insert(handle);

    let mut response = next.run(req).await;
    if created {
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Strict");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}
