//! In-memory doubles for the domain's capability traits.
//!
//! Used by this crate's tests and, through the `mock` feature, by `web`'s.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::connection_store::ConnectionStore;
use crate::error::{Error, LinkErrorKind};
use crate::google_sheets_connections::Model;
use crate::identity::{AuthenticatedCaller, IdentityVerifier};

/// Connection store backed by a map keyed by `user_id`, recording every upsert.
#[derive(Default)]
pub struct MemoryConnectionStore {
    connections: Mutex<HashMap<String, Model>>,
    upserts: Mutex<Vec<Model>>,
}

impl MemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a connection without counting it as an upsert.
    pub async fn insert(&self, connection: Model) {
        self.connections
            .lock()
            .await
            .insert(connection.user_id.clone(), connection);
    }

    pub async fn get(&self, user_id: &str) -> Option<Model> {
        self.connections.lock().await.get(user_id).cloned()
    }

    pub async fn upsert_count(&self) -> usize {
        self.upserts.lock().await.len()
    }

    pub async fn upserts(&self) -> Vec<Model> {
        self.upserts.lock().await.clone()
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn upsert(&self, connection: Model) -> Result<Model, Error> {
        self.upserts.lock().await.push(connection.clone());

        let mut connections = self.connections.lock().await;
        let stored = match connections.get(&connection.user_id) {
            Some(existing) => Model {
                id: existing.id,
                created_at: existing.created_at,
                ..connection
            },
            None => connection,
        };
        connections.insert(stored.user_id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Model>, Error> {
        Ok(self.get(user_id).await)
    }
}

/// Accepts a fixed set of bearer tokens, each mapped to a user id.
#[derive(Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, String>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, bearer_token: &str, user_id: &str) -> Self {
        self.tokens
            .insert(bearer_token.to_string(), user_id.to_string());
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, bearer_token: Option<&str>) -> Result<AuthenticatedCaller, Error> {
        bearer_token
            .and_then(|token| self.tokens.get(token))
            .map(|user_id| AuthenticatedCaller {
                user_id: user_id.clone(),
            })
            .ok_or_else(|| Error::link(LinkErrorKind::Unauthorized, "unknown bearer token"))
    }
}
