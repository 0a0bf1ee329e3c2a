//! Error types for `docdesk-server`.
//!
//! Panel actions never turn into HTTP errors: a failed action re-renders the
//! page with a notice. What remains here is startup configuration.

/// Errors from loading [`ServerConfig`](crate::config::ServerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is neither set nor baked in at build time.
    #[error("{var} is not set (set it at build or deploy time)")]
    Missing { var: &'static str },

    /// A variable is set but does not parse.
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}
