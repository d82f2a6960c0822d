//! Error types for the `sheets-auth` crate.
//!
//! Follows the same pattern as domain::error with a root Error struct and error kind enums.

use std::error::Error as StdError;
use std::fmt;

/// Top-level error type for sheets-auth crate.
/// Holds error kind and optional source for error chaining.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: ErrorKind,
}

/// Major categories of errors in sheets-auth.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    OAuth(OAuthErrorKind),
    Http(HttpErrorKind),
}

/// Errors from OAuth operations.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    /// The state parameter could not be decoded into a well-formed state token.
    InvalidState,
    /// The provider rejected the authorization code or could not be reached.
    TokenExchangeFailed,
    /// The id_token returned with the grant is malformed or lacks required claims.
    InvalidIdentityAssertion,
    RevocationFailed,
    InvalidResponse,
}

/// Errors from HTTP client operations.
#[derive(Debug, PartialEq)]
pub enum HttpErrorKind {
    BuilderFailed,
    RequestFailed,
    Timeout,
    Network,
}

impl Error {
    /// Returns the OAuth error kind, if this is an OAuth error.
    pub fn oauth_kind(&self) -> Option<&OAuthErrorKind> {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => Some(kind),
            ErrorKind::Http(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            ErrorKind::OAuth(kind) => write!(f, "OAuth error: {:?}", kind)?,
            ErrorKind::Http(kind) => write!(f, "HTTP error: {:?}", kind)?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let error_kind = if err.is_builder() {
            ErrorKind::Http(HttpErrorKind::BuilderFailed)
        } else if err.is_timeout() {
            ErrorKind::Http(HttpErrorKind::Timeout)
        } else if err.is_request() {
            ErrorKind::Http(HttpErrorKind::RequestFailed)
        } else {
            ErrorKind::Http(HttpErrorKind::Network)
        };

        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

/// Helper function to create OAuth errors.
pub fn oauth_error(kind: OAuthErrorKind, message: &str) -> Error {
    Error {
        source: Some(message.to_string().into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

/// Wraps an underlying error as an OAuth error of the given kind.
pub fn oauth_error_from<E>(kind: OAuthErrorKind, err: E) -> Error
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    Error {
        source: Some(err.into()),
        error_kind: ErrorKind::OAuth(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = oauth_error(OAuthErrorKind::InvalidState, "state is not base64url");
        let rendered = err.to_string();

        assert!(rendered.contains("InvalidState"));
        assert!(rendered.contains("state is not base64url"));
    }

    #[test]
    fn oauth_kind_is_exposed_for_oauth_errors_only() {
        let oauth = oauth_error(OAuthErrorKind::TokenExchangeFailed, "denied");
        assert_eq!(oauth.oauth_kind(), Some(&OAuthErrorKind::TokenExchangeFailed));

        let http = Error {
            source: None,
            error_kind: ErrorKind::Http(HttpErrorKind::Network),
        };
        assert_eq!(http.oauth_kind(), None);
    }
}
