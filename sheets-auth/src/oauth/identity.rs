//! Identity assertions carried by the provider's `id_token`.
//!
//! The payload segment is decoded but the signature is NOT verified against the
//! provider's signing keys. The token arrives directly from the token endpoint over
//! TLS, but callers must not treat the result as independently authenticated.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

use crate::error::{oauth_error, oauth_error_from, Error, OAuthErrorKind};

/// Provider-side identity of the account that granted access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssertion {
    /// Stable provider user identifier (`sub`).
    pub subject_id: String,
    pub email: String,
}

#[derive(Deserialize)]
struct Claims {
    sub: Option<String>,
    email: Option<String>,
}

impl IdentityAssertion {
    /// Decodes the claims segment of a compact `header.payload.signature` token.
    ///
    /// Fails closed: anything other than exactly three segments whose middle one is
    /// base64url JSON with non-empty string `sub` and `email` claims is rejected.
    pub fn decode(id_token: &str) -> Result<Self, Error> {
        let segments: Vec<&str> = id_token.split('.').collect();
        if segments.len() != 3 {
            return Err(oauth_error(
                OAuthErrorKind::InvalidIdentityAssertion,
                "id_token is not a three segment token",
            ));
        }

        let payload = URL_SAFE_NO_PAD
            .decode(segments[1].trim_end_matches('='))
            .map_err(|e| oauth_error_from(OAuthErrorKind::InvalidIdentityAssertion, e))?;

        let claims: Claims = serde_json::from_slice(&payload)
            .map_err(|e| oauth_error_from(OAuthErrorKind::InvalidIdentityAssertion, e))?;

        match (claims.sub, claims.email) {
            (Some(sub), Some(email)) if !sub.is_empty() && !email.is_empty() => Ok(Self {
                subject_id: sub,
                email,
            }),
            _ => Err(oauth_error(
                OAuthErrorKind::InvalidIdentityAssertion,
                "id_token is missing the sub or email claim",
            )),
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
