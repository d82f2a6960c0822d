//! Domain layer for linking host application users to their Google accounts.
//!
//! Consumers of this crate should not need to depend on `entity_api` or `entity`
//! directly; the connection model and its status enum are re-exported here.
pub use entity_api::{connection_status, google_sheets_connections, Id};

pub mod connection_store;
pub mod error;
pub mod gateway;
pub mod google_sheets_connection;
pub mod identity;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
