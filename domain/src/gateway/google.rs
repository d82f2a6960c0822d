//! Google OAuth provider built from application config.

use log::*;
use secrecy::SecretString;
use service::config::Config;
use sheets_auth::http::HttpClientBuilder;
use sheets_auth::oauth::providers::google::{Credentials, Endpoints};

pub use sheets_auth::oauth::providers::google::Provider as GoogleProvider;

use crate::error::Error;

/// Create the Google OAuth provider from config.
///
/// Fails with `InternalErrorKind::Config` when the client registration is incomplete.
/// Calls made through the provider are bounded by `token_exchange_timeout`.
pub fn new_provider(config: &Config) -> Result<GoogleProvider, Error> {
    let client_id = config
        .google_client_id()
        .ok_or_else(|| Error::config("GOOGLE_CLIENT_ID is not set"))?;
    let client_secret = config
        .google_client_secret()
        .ok_or_else(|| Error::config("GOOGLE_CLIENT_SECRET is not set"))?;
    let redirect_uri = config
        .google_redirect_uri()
        .ok_or_else(|| Error::config("GOOGLE_REDIRECT_URI is not set"))?;

    let http_client = HttpClientBuilder::new()
        .with_timeout(config.token_exchange_timeout())
        .build()?;

    debug!(
        "Configured Google provider with redirect_uri {} and timeout {:?}",
        redirect_uri,
        config.token_exchange_timeout()
    );

    Ok(GoogleProvider::new(
        Credentials {
            client_id,
            client_secret: SecretString::from(client_secret),
            redirect_uri,
        },
        Endpoints {
            auth_url: config.google_auth_url().to_string(),
            token_url: config.google_token_url().to_string(),
            revoke_url: config.google_revoke_url().to_string(),
        },
        config.google_scopes(),
        http_client,
    ))
}
