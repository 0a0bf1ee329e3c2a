//! Server configuration for `docdesk`.
//!
//! The API key and project id are fixed when the binary is built
//! (`DOCDESK_API_KEY` / `DOCDESK_PROJECT_ID` in the build environment) or when
//! it is deployed (the same variables at startup). Nothing can change them
//! once the server is running.

use std::net::SocketAddr;
use std::time::Duration;

use docdesk_store::{GatewayConfig, DEFAULT_FIRESTORE_URL, DEFAULT_IDENTITY_URL};

use crate::error::ConfigError;

const BUILD_API_KEY: Option<&str> = option_env!("DOCDESK_API_KEY");
const BUILD_PROJECT_ID: Option<&str> = option_env!("DOCDESK_PROJECT_ID");

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Gateway endpoints and identifiers.
    pub gateway: GatewayConfig,
    /// Browser sessions idle longer than this are dropped.
    pub session_idle: Duration,
    /// Seconds between idle-session sweeps.
    pub session_sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `DOCDESK_API_KEY`, `DOCDESK_PROJECT_ID` (required unless baked in at build time)
    /// - `DOCDESK_BIND_ADDR` (full bind address, default: `127.0.0.1:8080`)
    /// - `PORT` (binds `0.0.0.0:{PORT}` when `DOCDESK_BIND_ADDR` is unset)
    /// - `DOCDESK_LOG_LEVEL` (log filter, default: `info`)
    /// - `DOCDESK_IDENTITY_URL`, `DOCDESK_FIRESTORE_URL` (endpoint bases, for emulators)
    /// - `DOCDESK_REQUEST_TIMEOUT_SECS` (optional per-request timeout)
    /// - `DOCDESK_SESSION_IDLE_SECS` (default: `3600`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an identifier is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // Priority: DOCDESK_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Some(addr) = var("DOCDESK_BIND_ADDR") {
            addr.parse().map_err(|_| ConfigError::Invalid {
                var: "DOCDESK_BIND_ADDR",
                value: addr,
            })?
        } else if let Some(port) = var("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: port,
            })?;
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        };

        let api_key = var("DOCDESK_API_KEY")
            .or_else(|| BUILD_API_KEY.map(str::to_owned))
            .ok_or(ConfigError::Missing {
                var: "DOCDESK_API_KEY",
            })?;
        let project_id = var("DOCDESK_PROJECT_ID")
            .or_else(|| BUILD_PROJECT_ID.map(str::to_owned))
            .ok_or(ConfigError::Missing {
                var: "DOCDESK_PROJECT_ID",
            })?;

        let mut gateway = GatewayConfig::new(api_key, project_id);
        gateway.identity_url =
            var("DOCDESK_IDENTITY_URL").unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_owned());
        gateway.firestore_url =
            var("DOCDESK_FIRESTORE_URL").unwrap_or_else(|| DEFAULT_FIRESTORE_URL.to_owned());
        gateway.timeout = parse_secs(&var, "DOCDESK_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        let log_level = var("DOCDESK_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        let session_idle =
            Duration::from_secs(parse_secs(&var, "DOCDESK_SESSION_IDLE_SECS")?.unwrap_or(3600));

        Ok(Self {
            bind_addr,
            log_level,
            gateway,
            session_idle,
            session_sweep_interval_secs: 60,
        })
    }
}

fn parse_secs<F>(var: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var: name, value: v })
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    const IDS: [(&str, &str); 2] = [("DOCDESK_API_KEY", "k"), ("DOCDESK_PROJECT_ID", "p")];

    #[test]
    fn defaults_with_identifiers_only() {
        let cfg = load(&IDS).unwrap();
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.gateway.api_key, "k");
        assert_eq!(cfg.gateway.project_id, "p");
        assert_eq!(cfg.gateway.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(cfg.gateway.timeout, None);
        assert_eq!(cfg.session_idle, Duration::from_secs(3600));
    }

    #[test]
    fn port_binds_all_interfaces() {
        let mut vars = IDS.to_vec();
        vars.push(("PORT", "9000"));
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
    }

    #[test]
    fn bind_addr_overrides_port() {
        let mut vars = IDS.to_vec();
        vars.push(("PORT", "9000"));
        vars.push(("DOCDESK_BIND_ADDR", "127.0.0.1:7000"));
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.bind_addr.port(), 7000);
    }

    #[test]
    fn emulator_urls_and_timeout() {
        let mut vars = IDS.to_vec();
        vars.push(("DOCDESK_FIRESTORE_URL", "http://localhost:8081"));
        vars.push(("DOCDESK_REQUEST_TIMEOUT_SECS", "15"));
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.gateway.firestore_url, "http://localhost:8081");
        assert_eq!(cfg.gateway.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn bad_number_is_reported() {
        let mut vars = IDS.to_vec();
        vars.push(("DOCDESK_REQUEST_TIMEOUT_SECS", "soon"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "DOCDESK_REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn missing_identifier_is_reported_unless_baked_in() {
        let result = load(&[("DOCDESK_API_KEY", "k")]);
        if BUILD_PROJECT_ID.is_none() {
            assert!(matches!(
                result,
                Err(ConfigError::Missing {
                    var: "DOCDESK_PROJECT_ID"
                })
            ));
        } else {
            assert!(result.is_ok());
        }
    }
}
