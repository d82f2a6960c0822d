//! Google OAuth provider implementation.

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{oauth_error, oauth_error_from, Error, OAuthErrorKind};
use crate::oauth::token::{ExchangedGrant, TokenGrant, TokenResponse};

/// OAuth client registration issued by the Google Cloud console.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
}

/// Google's OAuth endpoint URLs. Overridable so tests can target a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub revoke_url: String,
}

/// Request to exchange authorization code for tokens
#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'static str,
}

#[derive(Serialize)]
struct RevokeRequest<'a> {
    token: &'a str,
}

/// Google OAuth provider.
///
/// Handles the authorization-code flow for Google accounts:
/// - Authorization URL generation (offline access, forced consent)
/// - Authorization code exchange
/// - Token revocation
pub struct Provider {
    credentials: Credentials,
    endpoints: Endpoints,
    scopes: Vec<String>,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Google OAuth provider.
    ///
    /// `http_client` should carry the request timeout; see
    /// [`crate::http::HttpClientBuilder`].
    pub fn new(
        credentials: Credentials,
        endpoints: Endpoints,
        scopes: Vec<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            endpoints,
            scopes,
            http_client,
        }
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn authorization_url(&self, state: &str) -> String {
        let scopes = self.scopes.join(" ");

        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            prompt=consent&\
            state={}",
            self.endpoints.auth_url,
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<ExchangedGrant, Error> {
        let request = TokenExchangeRequest {
            code,
            client_id: &self.credentials.client_id,
            client_secret: self.credentials.client_secret.expose_secret(),
            redirect_uri: &self.credentials.redirect_uri,
            grant_type: "authorization_code",
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Google token endpoint: {:?}", e);
                oauth_error_from(OAuthErrorKind::TokenExchangeFailed, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google token endpoint returned {}: {}", status, error_text);
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("token endpoint returned {status}"),
            ));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Google token response: {:?}", e);
            oauth_error_from(OAuthErrorKind::TokenExchangeFailed, e)
        })?;

        info!("Successfully exchanged Google OAuth code for tokens");

        let id_token = body.id_token.clone();
        Ok(ExchangedGrant {
            grant: TokenGrant::from_response(body, Utc::now()),
            id_token,
        })
    }

    async fn revoke_token(&self, token: &str) -> Result<(), Error> {
        let response = self
            .http_client
            .post(&self.endpoints.revoke_url)
            .form(&RevokeRequest { token })
            .send()
            .await
            .map_err(|e| oauth_error_from(OAuthErrorKind::RevocationFailed, e))?;

        let status = response.status();
        if status.is_success() {
            debug!("Google accepted token revocation");
            Ok(())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(oauth_error(
                OAuthErrorKind::RevocationFailed,
                &format!("revoke endpoint returned {status}: {error_text}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClientBuilder;
    use crate::oauth::{encode_unsigned, Provider as _};
    use mockito::Matcher;
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;

    fn provider_for(server_url: &str) -> Provider {
        Provider::new(
            Credentials {
                client_id: "client-123.apps.googleusercontent.com".to_string(),
                client_secret: SecretString::from("shh".to_string()),
                redirect_uri: "https://api.example.com/integrations/google-sheets/callback"
                    .to_string(),
            },
            Endpoints {
                auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
                token_url: format!("{server_url}/token"),
                revoke_url: format!("{server_url}/revoke"),
            },
            vec![
                "openid".to_string(),
                "email".to_string(),
                "https://www.googleapis.com/auth/spreadsheets".to_string(),
            ],
            HttpClientBuilder::new()
                .with_timeout(Duration::from_secs(5))
                .build()
                .unwrap(),
        )
    }

    fn query_of(url: &str) -> HashMap<String, String> {
        url::Url::parse(url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[test]
    fn authorization_url_carries_required_parameters() {
        let provider = provider_for("http://unused");
        let url = provider.authorization_url("c3RhdGU");

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        let query = query_of(&url);
        assert_eq!(query["client_id"], "client-123.apps.googleusercontent.com");
        assert_eq!(
            query["redirect_uri"],
            "https://api.example.com/integrations/google-sheets/callback"
        );
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["access_type"], "offline");
        assert_eq!(query["prompt"], "consent");
        assert_eq!(
            query["scope"],
            "openid email https://www.googleapis.com/auth/spreadsheets"
        );
        assert_eq!(query["state"], "c3RhdGU");
    }

    #[tokio::test]
    async fn exchange_code_posts_form_and_returns_grant() {
        let mut server = mockito::Server::new_async().await;
        let id_token = encode_unsigned(&json!({ "sub": "g-1", "email": "a@example.com" }));
        let mock = server
            .mock("POST", "/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded(
                    "client_id".into(),
                    "client-123.apps.googleusercontent.com".into(),
                ),
                Matcher::UrlEncoded("client_secret".into(), "shh".into()),
                Matcher::UrlEncoded(
                    "redirect_uri".into(),
                    "https://api.example.com/integrations/google-sheets/callback".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "ya29.token",
                    "refresh_token": "1//refresh",
                    "expires_in": 3599,
                    "scope": "openid https://www.googleapis.com/auth/spreadsheets email",
                    "token_type": "Bearer",
                    "id_token": id_token,
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let exchanged = provider.exchange_code("auth-code").await.unwrap();

        mock.assert_async().await;
        assert_eq!(exchanged.grant.access_token.expose_secret(), "ya29.token");
        assert_eq!(
            exchanged.grant.refresh_token.unwrap().expose_secret(),
            "1//refresh"
        );
        assert_eq!(exchanged.grant.scopes.len(), 3);
        assert_eq!(exchanged.id_token, Some(id_token));
    }

    #[tokio::test]
    async fn exchange_code_fails_on_provider_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .exchange_code("used-code")
            .await
            .unwrap_err();

        assert_eq!(err.oauth_kind(), Some(&OAuthErrorKind::TokenExchangeFailed));
    }

    #[tokio::test]
    async fn exchange_code_fails_on_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .exchange_code("code")
            .await
            .unwrap_err();

        assert_eq!(err.oauth_kind(), Some(&OAuthErrorKind::TokenExchangeFailed));
    }

    #[tokio::test]
    async fn exchange_code_fails_when_provider_unreachable() {
        // Nothing listens on port 9 (discard) in the test environment.
        let err = provider_for("http://127.0.0.1:9")
            .exchange_code("code")
            .await
            .unwrap_err();

        assert_eq!(err.oauth_kind(), Some(&OAuthErrorKind::TokenExchangeFailed));
    }

    #[tokio::test]
    async fn revoke_token_posts_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/revoke")
            .match_body(Matcher::UrlEncoded("token".into(), "1//refresh".into()))
            .with_status(200)
            .create_async()
            .await;

        provider_for(&server.url())
            .revoke_token("1//refresh")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn revoke_token_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/revoke")
            .with_status(400)
            .with_body(r#"{"error":"invalid_token"}"#)
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .revoke_token("expired")
            .await
            .unwrap_err();

        assert_eq!(err.oauth_kind(), Some(&OAuthErrorKind::RevocationFailed));
    }
}
