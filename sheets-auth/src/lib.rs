//! # sheets-auth
//!
//! OAuth 2.0 plumbing for linking a user's Google account:
//! - Self-contained, tamper-evident `state` tokens
//! - Google authorization URL, code exchange and token revocation
//! - id_token identity assertion decoding
//! - HTTP client building with a bounded request timeout
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sheets_auth::{
//!     http::HttpClientBuilder,
//!     oauth::{providers::google, Provider, StateToken},
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
