use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use domain::error::{
    DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind, LinkErrorKind,
};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: &'static str,
}

impl Error {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let (status, error, message) = match &self.0.error_kind {
            DomainErrorKind::Link(link_error_kind) => match link_error_kind {
                LinkErrorKind::Unauthorized => (
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "A valid bearer token is required",
                ),
                LinkErrorKind::InvalidState => (
                    StatusCode::BAD_REQUEST,
                    "invalid_state",
                    "The OAuth state is invalid or was issued to another user",
                ),
                LinkErrorKind::TokenExchangeFailed => (
                    StatusCode::BAD_GATEWAY,
                    "token_exchange_failed",
                    "Google did not accept the authorization code",
                ),
                LinkErrorKind::InvalidRequest => (
                    StatusCode::BAD_REQUEST,
                    "invalid_request",
                    "The request body could not be parsed",
                ),
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => (
                    StatusCode::BAD_GATEWAY,
                    "bad_gateway",
                    "Google could not be reached",
                ),
                ExternalErrorKind::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                ),
            },
            DomainErrorKind::Internal(InternalErrorKind::Config) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "not_configured",
                "The Google Sheets integration is not configured",
            ),
            DomainErrorKind::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            ),
        };

        (status, ErrorBody { error, message })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            error!("{} ({}): {:?}", status, body.error, self.0);
        } else {
            debug!("{} ({}): {:?}", status, body.error, self.0);
        }

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(err: DomainError) -> (StatusCode, Value) {
        let response = Error::from(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn link_errors_map_to_their_codes() {
        for (kind, status, code) in [
            (LinkErrorKind::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
            (LinkErrorKind::InvalidState, StatusCode::BAD_REQUEST, "invalid_state"),
            (
                LinkErrorKind::TokenExchangeFailed,
                StatusCode::BAD_GATEWAY,
                "token_exchange_failed",
            ),
            (LinkErrorKind::InvalidRequest, StatusCode::BAD_REQUEST, "invalid_request"),
        ] {
            let (actual_status, body) = render(DomainError::link(kind, "test")).await;
            assert_eq!(actual_status, status);
            assert_eq!(body["error"], code);
            assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
        }
    }

    #[tokio::test]
    async fn config_errors_are_not_configured() {
        let (status, body) = render(DomainError::config("missing")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "not_configured");
    }

    #[tokio::test]
    async fn network_errors_are_bad_gateway() {
        let (status, body) = render(DomainError {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "bad_gateway");
    }

    #[tokio::test]
    async fn other_internal_errors_hide_details() {
        let (status, body) = render(DomainError {
            source: Some("connection reset by peer".into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "database".to_string(),
            )),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
        assert!(!body.to_string().contains("connection reset"));
    }
}
