//! `docdesk` HTTP server.
//!
//! Wires the panel controller, the document gateway and the HTML views into
//! an Axum application. Each browser gets its own session, keyed by cookie.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
