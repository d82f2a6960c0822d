//! OAuth provider trait and types.

use async_trait::async_trait;

use super::token::ExchangedGrant;
use crate::error::Error;

/// Trait for OAuth 2.0 authorization-code providers.
///
/// Implementations are configured once (client credentials, endpoints, scopes)
/// and hold no per-flow state, so a single instance can serve concurrent requests.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the authorization URL to send the user to, carrying the encoded state.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for a token grant.
    ///
    /// Any transport failure, non-2xx response, or malformed body is reported as
    /// `OAuthErrorKind::TokenExchangeFailed`.
    async fn exchange_code(&self, code: &str) -> Result<ExchangedGrant, Error>;

    /// Revoke a token (access or refresh) at the provider.
    async fn revoke_token(&self, token: &str) -> Result<(), Error>;
}
