//! Error types for `docdesk-core`.
//!
//! Messages are what the panel shows the user, so gateway errors pass the
//! remote service's text through unchanged.

use docdesk_store::GatewayError;

/// Errors from submitting a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// One or more required inputs were left empty.
    #[error("Please fill required fields!")]
    MissingRequired { labels: Vec<&'static str> },
}

/// Errors from a panel action.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// A data action was attempted without a credential.
    #[error("Please sign in first!")]
    NotAuthenticated,

    /// The action needs an active collection.
    #[error("Select a collection first!")]
    NoCollection,

    /// The path is not among the currently listed documents.
    #[error("document not found: {path}")]
    UnknownDocument { path: String },

    /// Confirm was requested with nothing staged.
    #[error("nothing is awaiting confirmation")]
    NothingStaged,

    /// Form validation failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The identity service or document store rejected a call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PanelError {
    /// Short category for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotAuthenticated | Self::Gateway(GatewayError::Auth(_)) => "auth",
            Self::Gateway(GatewayError::Read(_)) => "read",
            Self::Gateway(GatewayError::Write(_)) => "write",
            Self::Gateway(_) => "transport",
            Self::NoCollection
            | Self::UnknownDocument { .. }
            | Self::NothingStaged
            | Self::Form(_) => "input",
        }
    }
}
