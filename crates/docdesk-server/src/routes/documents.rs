//! Add/edit forms and staging of saves and deletes.
//!
//! Staging never calls the document store; it only prepares the
//! confirmation that `/confirm` acts on.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::session::{Flash, SessionHandle};
use crate::state::AppState;

use super::{home, report};

/// Prefix of form inputs that carry document fields.
const FIELD_PREFIX: &str = "field.";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents/new", get(new_form))
        .route("/documents/edit", get(edit_form))
        .route("/documents/close", post(close_form))
        .route("/documents/save", post(save))
        .route("/documents/delete", post(delete))
}

#[derive(Deserialize)]
struct PathParam {
    path: String,
}

async fn new_form(Extension(handle): Extension<SessionHandle>) -> Redirect {
    let mut session = handle.lock().await;
    match session.controller.open_create_form() {
        Ok(form) => session.open_form = Some(form),
        Err(e) => report(&mut session, "open_create_form", &e),
    }
    home()
}

async fn edit_form(
    Extension(handle): Extension<SessionHandle>,
    Query(param): Query<PathParam>,
) -> Redirect {
    let mut session = handle.lock().await;
    match session.controller.open_edit_form(&param.path) {
        Ok(form) => session.open_form = Some(form),
        Err(e) => report(&mut session, "open_edit_form", &e),
    }
    home()
}

async fn close_form(Extension(handle): Extension<SessionHandle>) -> Redirect {
    handle.lock().await.open_form = None;
    home()
}

/// Copy the submitted values onto the open form and stage the save.
///
/// The form stays open with what was entered, so a failed validation or a
/// cancelled confirmation returns to it.
async fn save(
    Extension(handle): Extension<SessionHandle>,
    Form(body): Form<HashMap<String, String>>,
) -> Redirect {
    let mut session = handle.lock().await;
    let Some(mut form) = session.open_form.take() else {
        session.flash = Some(Flash::error("No form is open."));
        return home();
    };

    form.apply(
        body.iter()
            .filter_map(|(key, value)| Some((key.strip_prefix(FIELD_PREFIX)?, value.as_str()))),
    );
    if let Some(id) = body.get("doc_id") {
        form.set_doc_id(id);
    }

    let staged = session.controller.stage_save(&form).map(|_| ());
    session.open_form = Some(form);
    if let Err(e) = staged {
        report(&mut session, "stage_save", &e);
    }
    home()
}

async fn delete(
    Extension(handle): Extension<SessionHandle>,
    Form(param): Form<PathParam>,
) -> Redirect {
    let mut session = handle.lock().await;
    if let Err(e) = session.controller.stage_delete(&param.path) {
        report(&mut session, "stage_delete", &e);
    }
    home()
}
