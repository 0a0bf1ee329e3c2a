//! Panel controller.
//!
//! One [`Controller`] per browser session. It owns the [`Session`] and the
//! [`Confirmation`] state and is the only thing that writes to either; UI
//! bindings call its methods and render whatever comes back.

use std::sync::Arc;

use docdesk_store::{Credential, Document, DocumentGateway};
use tracing::{debug, info, warn};

use crate::confirm::{Confirmation, PendingAction, PendingSave};
use crate::error::PanelError;
use crate::form::{FormMode, FormModel};
use crate::session::Session;
use crate::view::{self, Card};

/// Outcome of a confirmed action, shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::Added => "Document added successfully!",
            Self::Updated => "Document updated successfully!",
            Self::Deleted => "Document deleted successfully!",
        }
    }
}

/// Result of a confirmed action whose write went through.
///
/// The follow-up re-fetch can still fail; that failure is carried here
/// instead of turning the committed write into an error.
#[derive(Debug)]
pub struct Confirmed {
    pub notice: Notice,
    pub refresh_error: Option<PanelError>,
}

/// Binds UI actions to the gateway, codec, schemas and confirmation flow.
pub struct Controller<G: ?Sized> {
    gateway: Arc<G>,
    session: Session,
    confirmation: Confirmation,
}

impl<G: ?Sized> std::fmt::Debug for Controller<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("session", &self.session)
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

impl<G: DocumentGateway + ?Sized> Controller<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            session: Session::default(),
            confirmation: Confirmation::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The action awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&PendingAction> {
        self.confirmation.pending()
    }

    // ── Auth ─────────────────────────────────────────────────────────

    /// Sign in. Any previous session is dropped first, so a rejected sign-in
    /// always leaves the session without a credential.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::Gateway` with the identity service's message.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), PanelError> {
        self.logout();
        let credential = self.gateway.authenticate(email.trim(), password).await?;
        self.session.sign_in(email.trim(), credential);
        info!("session signed in");
        Ok(())
    }

    /// Forget the credential, cached documents and any staged action.
    pub fn logout(&mut self) {
        self.session.reset();
        self.confirmation = Confirmation::default();
    }

    // ── Reading ──────────────────────────────────────────────────────

    /// Make `collection` active and fetch it. Returns the document count.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` without a credential, or the gateway's read
    /// error.
    pub async fn select_collection(&mut self, collection: &str) -> Result<usize, PanelError> {
        self.credential()?;
        self.session.set_collection(collection);
        self.refresh().await
    }

    /// Re-fetch the active collection, replacing the cached list.
    ///
    /// # Errors
    ///
    /// Returns `NoCollection` if none is active, `NotAuthenticated` without a
    /// credential, or the gateway's read error.
    pub async fn refresh(&mut self) -> Result<usize, PanelError> {
        let credential = self.credential()?.clone();
        let collection = self
            .session
            .active_collection()
            .ok_or(PanelError::NoCollection)?
            .to_owned();

        let documents = self
            .gateway
            .list_documents(&credential, &collection)
            .await?;
        let count = documents.len();
        self.session.replace_documents(documents);
        debug!(collection = %collection, count, "collection refreshed");
        Ok(count)
    }

    /// Cards for the cached list, optionally filtered by id.
    pub fn cards(&self, search: Option<&str>) -> Vec<Card> {
        view::project(self.session.documents(), search)
    }

    // ── Forms ────────────────────────────────────────────────────────

    /// Blank add form for the active collection.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` or `NoCollection`.
    pub fn open_create_form(&self) -> Result<FormModel, PanelError> {
        self.credential()?;
        let collection = self.active_collection()?;
        Ok(FormModel::create(collection))
    }

    /// Edit form pre-filled from a listed document.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated`, `NoCollection`, or `UnknownDocument` if
    /// `path` is not in the cached list.
    pub fn open_edit_form(&self, path: &str) -> Result<FormModel, PanelError> {
        self.credential()?;
        let collection = self.active_collection()?;
        let doc = self.listed_document(path)?;
        Ok(FormModel::edit(collection, doc))
    }

    // ── Staging ──────────────────────────────────────────────────────

    /// Validate `form` and stage the save for confirmation.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` or `PanelError::Form` if validation fails.
    pub fn stage_save(&mut self, form: &FormModel) -> Result<&PendingAction, PanelError> {
        self.credential()?;
        let action = form.submit()?;
        self.stage(action)
    }

    /// Stage deletion of a listed document.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` or `UnknownDocument`.
    pub fn stage_delete(&mut self, path: &str) -> Result<&PendingAction, PanelError> {
        self.credential()?;
        self.listed_document(path)?;
        self.stage(PendingAction::Delete {
            path: path.to_owned(),
        })
    }

    fn stage(&mut self, action: PendingAction) -> Result<&PendingAction, PanelError> {
        if self.confirmation.stage(action).is_some() {
            debug!("replaced previously staged action");
        }
        self.confirmation.pending().ok_or(PanelError::NothingStaged)
    }

    /// Discard the staged action. Returns whether anything was staged.
    pub fn cancel(&mut self) -> bool {
        self.confirmation.cancel().is_some()
    }

    /// Run the staged action, then re-fetch the active collection once.
    ///
    /// The confirmation returns to idle whether or not the call succeeds.
    /// Once the write succeeds the result is `Ok`; a failed re-fetch is
    /// reported in [`Confirmed::refresh_error`].
    ///
    /// # Errors
    ///
    /// Returns `NothingStaged`, `NotAuthenticated`, or the gateway's error
    /// from the write.
    pub async fn confirm(&mut self) -> Result<Confirmed, PanelError> {
        let action = self.confirmation.confirm().ok_or(PanelError::NothingStaged)?;
        let credential = self.credential()?.clone();

        let notice = match action {
            PendingAction::Delete { path } => {
                self.gateway.delete_document(&credential, &path).await?;
                info!(path = %path, "document deleted");
                Notice::Deleted
            }
            PendingAction::Save(PendingSave {
                collection,
                mode: FormMode::Create,
                doc_id,
                fields,
                ..
            }) => {
                let doc = self
                    .gateway
                    .create_document(&credential, &collection, doc_id.as_deref(), &fields)
                    .await?;
                info!(path = %doc.name, "document created");
                Notice::Added
            }
            PendingAction::Save(PendingSave {
                mode: FormMode::Edit { path },
                fields,
                ..
            }) => {
                self.gateway
                    .update_document(&credential, &path, &fields)
                    .await?;
                info!(path = %path, fields = fields.len(), "document updated");
                Notice::Updated
            }
        };

        let refresh_error = if self.session.active_collection().is_some() {
            self.refresh().await.err()
        } else {
            None
        };
        if let Some(e) = &refresh_error {
            warn!(error = %e, "re-fetch after write failed");
        }
        Ok(Confirmed {
            notice,
            refresh_error,
        })
    }

    // ── Private ──────────────────────────────────────────────────────

    fn credential(&self) -> Result<&Credential, PanelError> {
        self.session.credential().ok_or(PanelError::NotAuthenticated)
    }

    fn active_collection(&self) -> Result<&str, PanelError> {
        self.session
            .active_collection()
            .ok_or(PanelError::NoCollection)
    }

    fn listed_document(&self, path: &str) -> Result<&Document, PanelError> {
        self.session
            .find_document(path)
            .ok_or_else(|| PanelError::UnknownDocument {
                path: path.to_owned(),
            })
    }
}
