//! OAuth 2.0 authorization-code infrastructure.
//!
//! Provides the self-contained state token, identity assertion decoding, and the
//! provider abstraction used to link a user's Google account.

mod identity;
mod provider;

pub mod providers;
pub mod state;
pub mod token;

pub use identity::IdentityAssertion;
pub use provider::Provider;
pub use state::StateToken;

#[cfg(test)]
pub(crate) use identity::encode_unsigned;
