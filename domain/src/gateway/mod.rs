//! Outbound provider gateways.
//!
//! Re-exports the OAuth provider abstraction from sheets-auth and builds the
//! configured Google provider.

pub mod google;

pub use sheets_auth::oauth::Provider;
pub use sheets_auth::oauth::token::{ExchangedGrant, TokenGrant};
