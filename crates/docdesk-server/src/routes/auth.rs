//! Sign-in and sign-out.

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::info;

use crate::session::{SessionHandle, SESSION_COOKIE};
use crate::state::AppState;

use super::{home, report};

pub fn login_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

pub fn logout_router() -> Router<Arc<AppState>> {
    Router::new().route("/logout", post(logout))
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn login(
    Extension(handle): Extension<SessionHandle>,
    Form(body): Form<LoginForm>,
) -> Response {
    let mut session = handle.lock().await;
    session.open_form = None;
    match session.controller.login(&body.email, &body.password).await {
        Ok(()) => info!("panel signed in"),
        Err(e) => report(&mut session, "login", &e),
    }
    home().into_response()
}

/// Drop the session entirely and expire the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(handle): Extension<SessionHandle>,
) -> Response {
    handle.lock().await.controller.logout();
    state.sessions.remove(&handle.id).await;
    info!("panel signed out");

    let expired = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Strict");
    ([(SET_COOKIE, expired)], home()).into_response()
}
