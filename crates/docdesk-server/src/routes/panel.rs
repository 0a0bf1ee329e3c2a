//! Page rendering and collection selection.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use docdesk_core::schema;

use crate::session::{Flash, SessionHandle};
use crate::state::AppState;
use crate::views::{self, Dashboard, Dialog};

use super::{home, report};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/collections/{name}", get(select_collection))
        .route("/refresh", post(refresh))
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Login page, or the dashboard with at most one dialog.
///
/// A staged action's confirmation wins over an open form.
async fn index(
    Extension(handle): Extension<SessionHandle>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let mut session = handle.lock().await;
    let flash = session.flash.take();
    let controller = &session.controller;

    if !controller.session().is_authenticated() {
        return Html(views::login_page(flash.as_ref()));
    }

    let search = params.q.as_deref().unwrap_or_default();
    let cards = controller.cards(Some(search));
    let dialog = controller
        .pending()
        .map(Dialog::Confirm)
        .or_else(|| session.open_form.as_ref().map(Dialog::Form));

    Html(views::dashboard(&Dashboard {
        email: controller.session().email().unwrap_or_default(),
        active: controller.session().active_collection(),
        search,
        cards: &cards,
        dialog,
        flash: flash.as_ref(),
    }))
}

async fn select_collection(
    Extension(handle): Extension<SessionHandle>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Response {
    let mut session = handle.lock().await;
    if !schema::is_known(&name) {
        session.flash = Some(Flash::error(format!("Unknown collection: {name}")));
        return home().into_response();
    }

    session.open_form = None;
    if let Err(e) = session.controller.select_collection(&name).await {
        report(&mut session, "select_collection", &e);
    }

    match params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Redirect::to(&format!("/?q={}", urlencoding::encode(q))).into_response(),
        None => home().into_response(),
    }
}

async fn refresh(Extension(handle): Extension<SessionHandle>) -> Response {
    let mut session = handle.lock().await;
    if session.controller.session().is_authenticated()
        && session.controller.session().active_collection().is_none()
    {
        session.flash = Some(Flash::error("Select a collection!"));
        return home().into_response();
    }
    if let Err(e) = session.controller.refresh().await {
        report(&mut session, "refresh", &e);
    }
    home().into_response()
}
