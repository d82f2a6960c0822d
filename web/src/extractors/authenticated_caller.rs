use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::identity;

use crate::{AppState, Error};

/// The verified host application user behind a request.
///
/// Reads `Authorization: Bearer <token>` and checks it with the configured
/// identity verifier. Requests without a valid token are rejected with 401
/// before the handler runs.
pub(crate) struct AuthenticatedCaller(pub identity::AuthenticatedCaller);

impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer_token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        let caller = state.identity_verifier.verify(bearer_token).await?;
        Ok(AuthenticatedCaller(caller))
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
        .filter(|token| !token.is_empty())
}
