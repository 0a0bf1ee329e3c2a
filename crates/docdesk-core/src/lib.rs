//! Core library for `docdesk`.
//!
//! Contains the field codec, the per-collection schema registry, the typed
//! form model, the confirmation state machine, the session state and the
//! controller that ties them to a [`DocumentGateway`](docdesk_store::DocumentGateway).
//! This crate renders nothing; the server crate turns [`view::Card`]s and
//! [`form::FormModel`]s into HTML.

pub mod codec;
pub mod confirm;
pub mod controller;
pub mod error;
pub mod form;
pub mod schema;
pub mod session;
pub mod view;

pub use controller::{Confirmed, Controller, Notice};
pub use error::{FormError, PanelError};
