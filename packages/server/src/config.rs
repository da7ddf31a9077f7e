//! Server configuration.
//!
//! Values come from command-line arguments or environment variables (see `bin/server.rs`)
//! and are collected into a [`ServerConfig`] before the server is composed.

use thiserror::Error;

use crate::{domain::DEFAULT_HISTORY_CAPACITY, infrastructure::auth::DEFAULT_TOKEN_TTL_SECONDS};

/// Signing secret used when none is configured. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "hiroba-development-secret-change-me";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// How `POST /login` treats the submitted password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CredentialPolicy {
    /// Any password is accepted
    #[default]
    AcceptAny,
    /// The first login registers the password, later logins must match it
    FirstUse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("jwt secret must not be empty")]
    EmptySecret,

    #[error("token ttl must be positive (got {0} seconds)")]
    NonPositiveTtl(i64),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub history_capacity: usize,
    pub token_ttl_seconds: i64,
    pub credential_policy: CredentialPolicy,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.token_ttl_seconds <= 0 {
            return Err(ConfigError::NonPositiveTtl(self.token_ttl_seconds));
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            credential_policy: CredentialPolicy::AcceptAny,
        }
    }
}
