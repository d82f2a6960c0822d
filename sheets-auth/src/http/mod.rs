//! HTTP client building for calls to the OAuth provider.

mod client;

pub use client::{HttpClientBuilder, HttpClientConfig};
