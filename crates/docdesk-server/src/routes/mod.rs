//! HTTP route handlers for the panel.
//!
//! Every panel action mutates the caller's session and redirects back to
//! `/`, which renders whatever the session now holds. Failures never become
//! HTTP errors; they are logged and shown as a notice on the next page.

pub mod auth;
pub mod confirm;
pub mod documents;
pub mod panel;

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::middleware as axum_mw;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use docdesk_core::PanelError;

use crate::session::{session_middleware, Flash, PanelSession};
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let panel_routes = Router::new()
        .merge(panel::router())
        .merge(documents::router())
        .merge(confirm::router())
        .merge(auth::logout_router())
        // Sign-in calls the identity service; cap how many run at once.
        .merge(
            auth::login_router().layer(tower::limit::ConcurrencyLimitLayer::new(16)),
        )
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(panel_routes)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn home() -> Redirect {
    Redirect::to("/")
}

/// Log a failed action and queue its message for the next page.
fn report(session: &mut PanelSession, action: &'static str, err: &PanelError) {
    warn!(action, kind = err.kind(), error = %err, "panel action failed");
    session.flash = Some(Flash::error(err.to_string()));
}
