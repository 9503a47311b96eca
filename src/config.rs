use std::env;

use thiserror::Error;

pub const DEFAULT_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SMS_API_URL: &str = "https://api.sandbox.africastalking.com/version1/messaging";
pub const DEFAULT_SMS_RECIPIENT: &str = "+254722123123";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a valid port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the individual fields when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    /// Connection string handed to the Postgres driver.
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            conninfo_value(&self.host),
            self.port,
            conninfo_value(&self.user),
            conninfo_value(&self.password),
            conninfo_value(&self.name),
        )
    }
}

/// Quotes a libpq keyword/value when it is empty or contains whitespace,
/// quotes or backslashes.
fn conninfo_value(raw: &str) -> String {
    let needs_quotes = raw.is_empty()
        || raw
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return raw.to_string();
    }
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

#[derive(Debug, Clone, PartialEq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmsConfig {
    pub api_key: String,
    pub username: String,
    pub api_url: String,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub oauth: OAuthConfig,
    pub sms: SmsConfig,
    pub session_secret: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            host: get("HOST", "0.0.0.0"),
            port: parse_port("PORT", get("PORT", "8080"))?,
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
                host: get("DB_HOST", "localhost"),
                port: parse_port("DB_PORT", get("DB_PORT", "5432"))?,
                user: get("DB_USER", "user"),
                password: get("DB_PASSWORD", "password"),
                name: get("DB_NAME", "database"),
            },
            oauth: OAuthConfig {
                client_id: get("CLIENT_ID", ""),
                client_secret: get("CLIENT_SECRET", ""),
                callback_url: get("CALL_BACK_URL", ""),
                authorize_url: get("OAUTH_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
                token_url: get("OAUTH_TOKEN_URL", DEFAULT_TOKEN_URL),
                api_url: get("OAUTH_API_URL", DEFAULT_API_URL),
            },
            sms: SmsConfig {
                api_key: get("SMS_SANDBOX_API_KEY", ""),
                username: get("SMS_SANDBOX_API_USERNAME", ""),
                api_url: get("SMS_API_URL", DEFAULT_SMS_API_URL),
                recipient: get("SMS_RECIPIENT", DEFAULT_SMS_RECIPIENT),
            },
            session_secret: lookup("SESSION_SECRET").filter(|secret| !secret.is_empty()),
        })
    }
}

fn parse_port(key: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort { key, value })
}
