//! Self-contained OAuth `state` tokens.
//!
//! The token carries everything the callback needs to correlate itself with the
//! request that started the flow, so no server-side state is kept between the two.
//! Its wire form is the base64url (unpadded) encoding of
//! `{"userId": .., "redirectPath": .., "nonce": ..}`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{oauth_error, oauth_error_from, Error, OAuthErrorKind};

const NONCE_BYTES: usize = 32;

/// Decoded contents of an OAuth `state` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateToken {
    /// Host application user that started the flow.
    pub user_id: String,
    /// In-app path to return to once the flow completes.
    pub redirect_path: String,
    /// Unpredictable value; never checked against storage.
    pub nonce: String,
}

impl StateToken {
    /// Creates a state token with a fresh nonce.
    pub fn new(user_id: impl Into<String>, redirect_path: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            redirect_path: redirect_path.into(),
            nonce: generate_nonce(),
        }
    }

    /// Serializes the token into its URL-safe wire form.
    pub fn encode(&self) -> String {
        // Serializing a struct of three strings cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parses a token from its wire form.
    ///
    /// Fails with `InvalidState` when the input is not base64url, not a JSON
    /// object, or when any of the three fields is missing, empty, or not a string.
    pub fn decode(token: &str) -> Result<Self, Error> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim_end_matches('='))
            .map_err(|e| oauth_error_from(OAuthErrorKind::InvalidState, e))?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| oauth_error_from(OAuthErrorKind::InvalidState, e))?;

        let fields = value
            .as_object()
            .ok_or_else(|| oauth_error(OAuthErrorKind::InvalidState, "state is not a JSON object"))?;

        Ok(Self {
            user_id: required_string(fields, "userId")?,
            redirect_path: required_string(fields, "redirectPath")?,
            nonce: required_string(fields, "nonce")?,
        })
    }
}

fn required_string(fields: &Map<String, Value>, name: &str) -> Result<String, Error> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(oauth_error(
            OAuthErrorKind::InvalidState,
            &format!("state field `{name}` is empty"),
        )),
        Some(_) => Err(oauth_error(
            OAuthErrorKind::InvalidState,
            &format!("state field `{name}` is not a string"),
        )),
        None => Err(oauth_error(
            OAuthErrorKind::InvalidState,
            &format!("state field `{name}` is missing"),
        )),
    }
}

// OsRng reads from the operating system's CSPRNG.
fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json.as_bytes())
    }

    fn assert_invalid_state(result: Result<StateToken, Error>) {
        let err = result.expect_err("decode should fail");
        assert_eq!(err.oauth_kind(), Some(&OAuthErrorKind::InvalidState));
    }

    #[test]
    fn round_trip_preserves_user_and_redirect_path() {
        for (user_id, path) in [
            ("user-1", "/app/dashboard"),
            ("5a3c0e1e-8d7b-4c39-9e0f-1f2a3b4c5d6e", "/"),
            ("ünïcødé", "/settings?tab=integrations&x=1"),
        ] {
            let decoded = StateToken::decode(&StateToken::new(user_id, path).encode()).unwrap();
            assert_eq!(decoded.user_id, user_id);
            assert_eq!(decoded.redirect_path, path);
            assert_eq!(decoded.nonce.len(), NONCE_BYTES * 2);
        }
    }

    #[test]
    fn encoded_form_needs_no_query_escaping() {
        let token = StateToken::new("user-1", "/a/b?c=d&e=f").encode();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn nonces_are_unique() {
        let a = StateToken::new("user-1", "/");
        let b = StateToken::new("user-1", "/");
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn decode_rejects_non_base64() {
        assert_invalid_state(StateToken::decode("not base64!"));
        assert_invalid_state(StateToken::decode(""));
    }

    #[test]
    fn decode_rejects_non_json_payload() {
        assert_invalid_state(StateToken::decode(&raw("hello world")));
        assert_invalid_state(StateToken::decode(&raw("[1,2,3]")));
    }

    #[test]
    fn decode_rejects_missing_fields() {
        assert_invalid_state(StateToken::decode(&raw(r#"{"userId":"u","redirectPath":"/"}"#)));
        assert_invalid_state(StateToken::decode(&raw(r#"{"userId":"u","nonce":"n"}"#)));
        assert_invalid_state(StateToken::decode(&raw(r#"{"redirectPath":"/","nonce":"n"}"#)));
    }

    #[test]
    fn decode_rejects_wrongly_typed_fields() {
        assert_invalid_state(StateToken::decode(&raw(
            r#"{"userId":42,"redirectPath":"/","nonce":"n"}"#,
        )));
        assert_invalid_state(StateToken::decode(&raw(
            r#"{"userId":"u","redirectPath":null,"nonce":"n"}"#,
        )));
    }

    #[test]
    fn decode_accepts_padded_input() {
        let json = r#"{"userId":"u","redirectPath":"/x","nonce":"n"}"#;
        let padded = base64::engine::general_purpose::URL_SAFE.encode(json);

        let decoded = StateToken::decode(&padded).unwrap();
        assert_eq!(decoded.user_id, "u");
        assert_eq!(decoded.redirect_path, "/x");
    }
}
