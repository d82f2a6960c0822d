//! Verification of the host application's own bearer tokens.
//!
//! Every operation starts by turning the caller's bearer token into an
//! [`AuthenticatedCaller`]. The production verifier checks an HS256 JWT signed by
//! the host application's auth backend; tests swap in [`crate::mock`] doubles.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::*;
use serde::Deserialize;
use service::config::Config;

use crate::error::{Error, LinkErrorKind};

/// The host application user making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub user_id: String,
}

/// Resolves a bearer token to the caller it was issued to.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Fails with `LinkErrorKind::Unauthorized` when the token is absent or invalid.
    async fn verify(&self, bearer_token: Option<&str>) -> Result<AuthenticatedCaller, Error>;
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
}

/// Verifies HS256 JWTs issued by the host application's auth backend.
pub struct JwtIdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str, audience: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret = config
            .identity_jwt_secret()
            .ok_or_else(|| Error::config("IDENTITY_JWT_SECRET is not set"))?;

        Ok(Self::new(
            &secret,
            config.identity_jwt_audience(),
            config.identity_jwt_issuer().as_deref(),
        ))
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, bearer_token: Option<&str>) -> Result<AuthenticatedCaller, Error> {
        let token = bearer_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::link(LinkErrorKind::Unauthorized, "missing bearer token"))?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).inspect_err(
            |e| debug!("Rejected bearer token: {e}"),
        )?;

        if data.claims.sub.is_empty() {
            return Err(Error::link(
                LinkErrorKind::Unauthorized,
                "bearer token has an empty subject",
            ));
        }

        Ok(AuthenticatedCaller {
            user_id: data.claims.sub,
        })
    }
}
