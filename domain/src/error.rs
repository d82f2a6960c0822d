//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use sheets_auth::error::{
    Error as SheetsAuthError, ErrorKind as SheetsAuthErrorKind, HttpErrorKind, OAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` matches on `error_kind` to pick an HTTP status and a
/// machine-readable error code, and never depends on `entity_api` or `sheets-auth` directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Link(LinkErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Entity errors bubbled up from `entity_api`, reduced to what the domain cares about.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    NotUpdated,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Other(String),
}

/// Failures of the account-linking flow that callers are expected to handle.
#[derive(Debug, PartialEq)]
pub enum LinkErrorKind {
    /// Missing or invalid caller credential.
    Unauthorized,
    /// Undecodable state token, or one minted for a different user.
    InvalidState,
    /// The provider rejected the code, could not be reached, or returned an
    /// unusable grant or identity assertion.
    TokenExchangeFailed,
    /// A request body or parameter that could not be parsed.
    InvalidRequest,
}

impl Error {
    pub fn link(kind: LinkErrorKind, message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Link(kind),
        }
    }

    pub fn config(message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::RecordNotUpdated => EntityErrorKind::NotUpdated,
            EntityApiErrorKind::SystemError => EntityErrorKind::Other("SystemError".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<SheetsAuthError> for Error {
    fn from(err: SheetsAuthError) -> Self {
        let error_kind = match &err.error_kind {
            SheetsAuthErrorKind::OAuth(OAuthErrorKind::InvalidState) => {
                DomainErrorKind::Link(LinkErrorKind::InvalidState)
            }
            SheetsAuthErrorKind::OAuth(
                OAuthErrorKind::TokenExchangeFailed | OAuthErrorKind::InvalidIdentityAssertion,
            ) => DomainErrorKind::Link(LinkErrorKind::TokenExchangeFailed),
            SheetsAuthErrorKind::OAuth(
                OAuthErrorKind::RevocationFailed | OAuthErrorKind::InvalidResponse,
            ) => DomainErrorKind::External(ExternalErrorKind::Other(err.to_string())),
            SheetsAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build HTTP client".to_string()),
            ),
            SheetsAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Link(LinkErrorKind::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheets_auth::error::oauth_error;

    #[test]
    fn oauth_invalid_state_becomes_link_invalid_state() {
        let err: Error = oauth_error(OAuthErrorKind::InvalidState, "bad").into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Link(LinkErrorKind::InvalidState)
        );
    }

    #[test]
    fn exchange_and_assertion_failures_become_token_exchange_failed() {
        for kind in [
            OAuthErrorKind::TokenExchangeFailed,
            OAuthErrorKind::InvalidIdentityAssertion,
        ] {
            let err: Error = oauth_error(kind, "bad").into();
            assert_eq!(
                err.error_kind,
                DomainErrorKind::Link(LinkErrorKind::TokenExchangeFailed)
            );
        }
    }

    #[test]
    fn entity_errors_are_internal() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::SystemError,
        }
        .into();
        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Other(_)))
        ));
    }
}
