use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::OAuthConfig;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const SCOPE: &str = "read:user user:email";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),
    #[error("provider rejected the access token with status {0}")]
    Rejected(StatusCode),
    #[error("{error}: {description}")]
    OAuth { error: String, description: String },
    #[error("state parameter does not match the session")]
    StateMismatch,
    #[error("missing authorization code")]
    MissingCode,
}

/// Profile returned by the provider's `/user` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderUser {
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted {
        access_token: String,
    },
    Denied {
        error: String,
        #[serde(default)]
        error_description: String,
    },
}

/// GitHub OAuth client: builds the authorize redirect, exchanges codes and
/// resolves access tokens to users.
#[derive(Debug, Clone)]
pub struct GithubProvider {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl GithubProvider {
    pub fn new(http: reqwest::Client, config: OAuthConfig) -> Self {
        Self { http, config }
    }

    pub fn authorization_url(&self, state: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| ProviderError::InvalidUrl(e.to_string()))
    }

    pub async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        let resp = self
            .http
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        match resp.json::<TokenResponse>().await? {
            TokenResponse::Granted { access_token } => Ok(access_token),
            TokenResponse::Denied {
                error,
                error_description,
            } => Err(ProviderError::OAuth {
                error,
                description: error_description,
            }),
        }
    }

    pub async fn fetch_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let url = format!("{}/user", self.config.api_url.trim_end_matches('/'));
        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Rejected(status));
        }
        Ok(resp.error_for_status()?.json().await?)
    }

    /// `Ok(false)` when the provider refuses the token; `Err` when the
    /// provider could not be asked.
    pub async fn validate_token(&self, access_token: &str) -> Result<bool, ProviderError> {
        match self.fetch_user(access_token).await {
            Ok(user) => Ok(!user.login.is_empty()),
            Err(ProviderError::Rejected(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
