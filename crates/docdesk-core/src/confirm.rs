//! Confirmation state machine for mutating actions.
//!
//! ```text
//! Idle ──stage──▶ Staged ──confirm──▶ (gateway call, re-fetch) ──▶ Idle
//!                   │
//!                   └──────cancel─────────────────────────────────▶ Idle
//! ```
//!
//! Only one action is staged at a time; staging again replaces it.

use std::mem;

use docdesk_store::FieldSet;

use crate::form::FormMode;

/// A save awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub collection: String,
    pub mode: FormMode,
    /// Client-chosen id for a create; `None` lets the store assign one.
    pub doc_id: Option<String>,
    /// Encoded fields to send.
    pub fields: FieldSet,
    /// `(field, raw input)` rows shown on the confirmation page.
    pub preview: Vec<(String, String)>,
}

/// An action staged between the user's click and their confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete { path: String },
    Save(PendingSave),
}

impl PendingAction {
    /// Heading of the confirmation dialog.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "Confirm Delete Document",
            Self::Save(PendingSave {
                mode: FormMode::Edit { .. },
                ..
            }) => "Confirm Update Document",
            Self::Save(_) => "Confirm Add Document",
        }
    }
}

/// Where the confirmation flow currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Confirmation {
    #[default]
    Idle,
    Staged(PendingAction),
}

impl Confirmation {
    /// Stage `action`, returning whatever it replaced.
    pub fn stage(&mut self, action: PendingAction) -> Option<PendingAction> {
        match mem::replace(self, Self::Staged(action)) {
            Self::Staged(previous) => Some(previous),
            Self::Idle => None,
        }
    }

    /// The staged action, if any.
    pub fn pending(&self) -> Option<&PendingAction> {
        match self {
            Self::Staged(action) => Some(action),
            Self::Idle => None,
        }
    }

    pub fn is_staged(&self) -> bool {
        matches!(self, Self::Staged(_))
    }

    /// Take the staged action for execution and return to `Idle`.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        self.take()
    }

    /// Discard the staged action and return to `Idle`.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.take()
    }

    fn take(&mut self) -> Option<PendingAction> {
        match mem::take(self) {
            Self::Staged(action) => Some(action),
            Self::Idle => None,
        }
    }
}
