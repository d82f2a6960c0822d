//! Persistence capability for Google Sheets connections.

use std::sync::Arc;

use async_trait::async_trait;
use entity_api::google_sheets_connection;
use sea_orm::DatabaseConnection;

use crate::error::Error;
use crate::google_sheets_connections::Model;

/// Durable store of one connection per host application user.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Writes `connection`, replacing any existing connection for the same user.
    async fn upsert(&self, connection: Model) -> Result<Model, Error>;

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Model>, Error>;
}

/// Postgres-backed store over the `google_sheets_connections` table.
#[derive(Clone)]
pub struct DbConnectionStore {
    db: Arc<DatabaseConnection>,
}

impl DbConnectionStore {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self { db: Arc::clone(db) }
    }
}

#[async_trait]
impl ConnectionStore for DbConnectionStore {
    async fn upsert(&self, connection: Model) -> Result<Model, Error> {
        Ok(google_sheets_connection::upsert_by_user(&self.db, connection).await?)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<Model>, Error> {
        Ok(google_sheets_connection::find_by_user(&self.db, user_id).await?)
    }
}
