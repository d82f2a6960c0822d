//! OAuth token grant types.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::Deserialize;

/// Raw token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub id_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Tokens obtained from a successful authorization-code exchange.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Only present on first consent or when a new one is forced via `prompt=consent`.
    /// Without it the grant is usable until `expires_at` but cannot be renewed.
    pub refresh_token: Option<SecretString>,
    pub expires_at: DateTime<Utc>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    pub token_type: String,
}

impl TokenGrant {
    /// Builds a grant from a token endpoint response received at `now`.
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
            refresh_token: response.refresh_token.map(SecretString::from),
            expires_at: now + Duration::seconds(response.expires_in.max(0)),
            scopes: response
                .scope
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            token_type: response.token_type,
        }
    }
}

/// A grant together with the id_token that accompanied it.
#[derive(Debug, Clone)]
pub struct ExchangedGrant {
    pub grant: TokenGrant,
    pub id_token: Option<String>,
}
