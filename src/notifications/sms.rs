use reqwest::StatusCode;
use thiserror::Error;

use crate::config::SmsConfig;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to send SMS: status code {0}")]
    Status(StatusCode),
}

/// Africa's Talking messaging client. One POST per message, no retries.
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    username: String,
}

impl SmsClient {
    pub fn new(http: reqwest::Client, config: &SmsConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            username: config.username.clone(),
        }
    }

    pub async fn send(&self, to: &str, message: &str) -> Result<(), SmsError> {
        let resp = self
            .http
            .post(&self.api_url)
            .header("apikey", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("username", self.username.as_str()),
                ("to", to),
                ("message", message),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SmsError::Status(resp.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn client_for(server: &MockServer) -> SmsClient {
        SmsClient::new(
            reqwest::Client::new(),
            &SmsConfig {
                api_key: "test-api-key".to_string(),
                username: "test-username".to_string(),
                api_url: server.url("/version1/messaging"),
                recipient: "+1234567890".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn posts_form_with_api_key_header() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/version1/messaging")
                    .header("apikey", "test-api-key")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .x_www_form_urlencoded_tuple("username", "test-username")
                    .x_www_form_urlencoded_tuple("to", "+1234567890")
                    .x_www_form_urlencoded_tuple("message", "Hello, this is a test message.");
                then.status(201).body("{}");
            })
            .await;

        client_for(&server)
            .send("+1234567890", "Hello, this is a test message.")
            .await
            .expect("send should succeed");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/version1/messaging");
                then.status(401).body("The supplied authentication is invalid");
            })
            .await;

        let err = client_for(&server).send("+1", "hi").await.unwrap_err();

        assert!(matches!(err, SmsError::Status(s) if s == StatusCode::UNAUTHORIZED));
        assert_eq!(err.to_string(), "failed to send SMS: status code 401 Unauthorized");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let client = SmsClient::new(
            reqwest::Client::new(),
            &SmsConfig {
                api_key: String::new(),
                username: String::new(),
                api_url: "http://127.0.0.1:1/messaging".to_string(),
                recipient: String::new(),
            },
        );

        let err = client.send("+1", "hi").await.unwrap_err();

        assert!(matches!(err, SmsError::Transport(_)));
    }
}
