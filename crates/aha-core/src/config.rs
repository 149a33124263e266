//! Configuration for the Aha! MCP server.
//!
//! The server is configured entirely from the environment, once, at startup:
//!
//! - `AHA_DOMAIN`: the account subdomain (`acme` for `acme.aha.io`)
//! - `AHA_API_TOKEN`: API key sent as a bearer token
//!
//! Both are required. A missing or empty variable is a configuration error
//! and the server must not start.
//!
//! # Example
//!
//! ```ignore
//! use aha_core::AhaConfig;
//!
//! let config = AhaConfig::from_env()?;
//! println!("{}", config.endpoint());
//! ```

use std::fmt;

use tracing::debug;

use crate::{Error, Result};

/// Environment variable holding the Aha! subdomain.
pub const DOMAIN_ENV: &str = "AHA_DOMAIN";

/// Environment variable holding the Aha! API token.
pub const TOKEN_ENV: &str = "AHA_API_TOKEN";

/// Connection settings for the Aha! GraphQL API.
#[derive(Clone, PartialEq, Eq)]
pub struct AhaConfig {
    /// Account subdomain
    pub domain: String,
    /// Bearer credential
    pub token: String,
}

impl AhaConfig {
    /// Create a config from explicit values.
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// The token is checked before the domain.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, TOKEN_ENV)?;
        let domain = required(&lookup, DOMAIN_ENV)?;

        debug!(domain = %domain, "Loaded Aha! configuration");
        Ok(Self { domain, token })
    }

    /// GraphQL endpoint derived from the domain.
    pub fn endpoint(&self) -> String {
        format!("https://{}.aha.io/api/v2/graphql", self.domain)
    }

    /// Token with everything but the last four characters masked.
    pub fn redacted_token(&self) -> String {
        let visible: String = self
            .token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if self.token.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("****{}", visible)
        }
    }
}

impl fmt::Debug for AhaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AhaConfig")
            .field("domain", &self.domain)
            .field("token", &self.redacted_token())
            .finish()
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::Config(format!(
            "{} environment variable is required",
            key
        ))),
    }
}
