//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use tabletop_shared::constants::{DEFAULT_HTTP_PORT, LOGIN_TOKEN_LIFETIME_MINUTES};

/// Signing secret used when `JWT_SECRET` is not set. Development only.
const DEV_JWT_SECRET: &str = "tabletop-dev-secret-change-me";

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./tabletop.db`
    pub database_path: PathBuf,

    /// HS256 signing secret for access tokens.
    /// Env: `JWT_SECRET`
    /// Default: a fixed development secret (logged as a warning).
    pub jwt_secret: String,

    /// Lifetime of the token handed out by `/login`, in minutes.
    /// Env: `ACCESS_TOKEN_EXPIRE_MINUTES`
    /// Default: `60`
    pub access_token_minutes: i64,

    /// Whether `/register` accepts new accounts.
    /// Env: `REGISTRATION_OPEN` (true/false)
    /// Default: `true`
    pub registration_open: bool,

    /// Mark the login cookie `Secure`.
    /// Env: `COOKIE_SECURE` (true/false)
    /// Default: `false`
    pub cookie_secure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./tabletop.db"),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_token_minutes: LOGIN_TOKEN_LIFETIME_MINUTES,
            registration_open: true,
            cookie_secure: false,
        }
    }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("registration_open", &self.registration_open)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = lookup("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => config.jwt_secret = secret,
            _ => tracing::warn!("JWT_SECRET not set, using development secret"),
        }

        if let Some(val) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            match val.parse::<i64>() {
                Ok(n) if n > 0 => config.access_token_minutes = n,
                _ => tracing::warn!(
                    value = %val,
                    "Invalid ACCESS_TOKEN_EXPIRE_MINUTES, using default"
                ),
            }
        }

        if let Some(val) = lookup("REGISTRATION_OPEN") {
            config.registration_open = val != "false" && val != "0";
        }

        if let Some(val) = lookup("COOKIE_SECURE") {
            config.cookie_secure = val == "true" || val == "1";
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    /// Lifetime of a login token.
    pub fn access_token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_minutes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = from_pairs(&[]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.database_path, PathBuf::from("./tabletop.db"));
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.access_token_minutes, 60);
        assert!(config.registration_open);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/var/lib/tabletop/db.sqlite"),
            ("JWT_SECRET", "s3cret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("REGISTRATION_OPEN", "false"),
            ("COOKIE_SECURE", "true"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/tabletop/db.sqlite")
        );
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_token_lifetime(), chrono::Duration::minutes(5));
        assert!(!config.registration_open);
        assert!(config.cookie_secure);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "-3"),
            ("JWT_SECRET", ""),
        ]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.access_token_minutes, 60);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = from_pairs(&[("JWT_SECRET", "s3cret")]);
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
