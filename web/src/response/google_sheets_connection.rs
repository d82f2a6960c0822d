use domain::connection_status::ConnectionStatus;
use domain::google_sheets_connections::Model;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartResponse {
    /// Google consent screen URL to send the user to.
    pub(crate) authorization_url: String,
}

/// A caller's link to Google, without any tokens.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectionResponse {
    /// Whether an active connection exists.
    pub(crate) connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<ConnectionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) google_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) google_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sheet_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) access_token_expires_at: Option<String>,
}

impl From<Option<Model>> for ConnectionResponse {
    fn from(connection: Option<Model>) -> Self {
        let Some(connection) = connection else {
            return Self::default();
        };

        Self {
            connected: connection.is_active(),
            status: Some(connection.status),
            scopes: Some(connection.scope_list()),
            access_token_expires_at: Some(connection.access_token_expires_at.to_rfc3339()),
            google_user_id: Some(connection.google_user_id),
            google_email: connection.google_email,
            spreadsheet_id: connection.spreadsheet_id,
            sheet_id: connection.sheet_id,
            sheet_title: connection.sheet_title,
        }
    }
}
