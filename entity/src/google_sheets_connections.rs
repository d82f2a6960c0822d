use crate::connection_status::ConnectionStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A host application user's link to a Google account. One row per user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(schema_name = "sheets_link", table_name = "google_sheets_connections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    #[sea_orm(unique)]
    pub user_id: String,
    pub google_user_id: String,
    pub google_email: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub sheet_id: Option<i64>,
    pub sheet_title: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub access_token_expires_at: DateTimeWithTimeZone,
    /// Space separated granted scopes.
    pub scopes: String,
    pub status: ConnectionStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Granted scopes as individual scope strings.
    pub fn scope_list(&self) -> Vec<String> {
        self.scopes
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.status == ConnectionStatus::Active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
