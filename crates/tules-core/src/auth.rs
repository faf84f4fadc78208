//! Access token exchange for the music service companion UI.
//!
//! Uses the client-credentials grant: the stored client id/secret are sent
//! as HTTP basic auth and the token endpoint answers with a bearer token.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
}

/// Exchanges client credentials for an access token.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthError>;
}

#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    client: Client,
    token_url: String,
}

impl Default for SpotifyAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotifyAuth {
    pub fn new() -> Self {
        Self::with_token_url(SPOTIFY_TOKEN_URL)
    }

    /// Point at a different token endpoint (tests, proxies).
    pub fn with_token_url(token_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token_url: token_url.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for SpotifyAuth {
    async fn access_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken, AuthError> {
        let resp = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;

        if let Some(error) = body.get("error") {
            let detail = body
                .get("error_description")
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            return Err(AuthError::TokenExchangeFailed(detail));
        }

        let access_token = body
            .get("access_token")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::TokenExchangeFailed("no access_token in response".into()))?;

        Ok(AccessToken {
            access_token: access_token.to_string(),
            token_type: body
                .get("token_type")
                .and_then(|v| v.as_str())
                .unwrap_or("Bearer")
                .to_string(),
            expires_in: body.get("expires_in").and_then(|v| v.as_u64()),
        })
    }
}
