//! OAuth token grants returned by the token endpoint.

mod tokens;

pub use tokens::{ExchangedGrant, TokenGrant, TokenResponse};
