use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Secrets the access gate checks a submitted password against.
#[derive(Clone, Debug, Default)]
pub struct AuthSecrets {
    pub password: Option<String>,
    pub password_sha256: Option<String>,
    pub password_argon2: Option<String>,
    pub tokens: BTreeSet<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_schema: String,
    pub database_max_connections: u32,
    pub server_addr: String,

    pub session_secret: String,
    pub session_ttl: u64,
    pub auth: AuthSecrets,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut tokens: BTreeSet<String> = optional("AUTH_TOKENS")
            .map(|list| split_tokens(&list))
            .unwrap_or_default();
        if let Some(token) = optional("AUTH_TOKEN") {
            tokens.insert(token.trim().to_string());
        }

        let database_schema = optional("DATABASE_SCHEMA").unwrap_or_else(|| "app".to_string());
        if !is_identifier(&database_schema) {
            return Err(ConfigError::Invalid {
                name: "DATABASE_SCHEMA",
                value: database_schema,
            });
        }

        if let Some(digest) = optional("AUTH_PASSWORD_SHA256") {
            if digest.trim().len() != 64 || hex::decode(digest.trim()).is_err() {
                return Err(ConfigError::Invalid {
                    name: "AUTH_PASSWORD_SHA256",
                    value: "<redacted>".to_string(),
                });
            }
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            database_schema,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,

            session_secret: required("SESSION_SECRET")?,
            session_ttl: parse_or(&lookup, "SESSION_TTL", 43_200)?, // default 12 h
            auth: AuthSecrets {
                password: optional("AUTH_PASSWORD"),
                password_sha256: optional("AUTH_PASSWORD_SHA256")
                    .map(|d| d.trim().to_ascii_lowercase()),
                password_argon2: optional("AUTH_PASSWORD_ARGON2"),
                tokens,
            },

            rate_protected_per_min: parse_or(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: optional("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: optional("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

fn split_tokens(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts plain SQL identifiers only, since the schema name is spliced into DDL.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63
}
