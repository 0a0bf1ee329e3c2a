//! Confirming or cancelling the staged action.

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Redirect;
use axum::routing::post;
use axum::Router;
use tracing::{debug, warn};

use docdesk_core::{Confirmed, Notice};

use crate::session::{Flash, SessionHandle};
use crate::state::AppState;

use super::home;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/confirm", post(confirm))
        .route("/cancel", post(cancel))
}

async fn confirm(Extension(handle): Extension<SessionHandle>) -> Redirect {
    let mut session = handle.lock().await;
    match session.controller.confirm().await {
        Ok(Confirmed {
            notice,
            refresh_error,
        }) => {
            if matches!(notice, Notice::Added | Notice::Updated) {
                session.open_form = None;
            }
            let message = match refresh_error {
                None => notice.message().to_owned(),
                Some(e) => format!("{} Reloading the list failed: {e}", notice.message()),
            };
            session.flash = Some(Flash::success(message));
        }
        Err(e) => {
            warn!(action = "confirm", kind = e.kind(), error = %e, "panel action failed");
            session.flash = Some(Flash::error(format!("Error: {e}")));
        }
    }
    home()
}

/// Discard the staged action. A cancelled save goes back to its form.
async fn cancel(Extension(handle): Extension<SessionHandle>) -> Redirect {
    if handle.lock().await.controller.cancel() {
        debug!("staged action cancelled");
    }
    home()
}
