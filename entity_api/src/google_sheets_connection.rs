use super::error::Error;
use entity::google_sheets_connections::{ActiveModel, Column, Entity, Model};
use log::debug;
use sea_orm::{entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, DatabaseConnection};

/// Inserts the connection, or overwrites the existing one for the same `user_id`.
///
/// A conflicting row keeps its `id` and `created_at`; every other column is replaced
/// with the new values. Returns the row as stored.
pub async fn upsert_by_user(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!(
        "Upserting Google Sheets connection for user_id: {}, status: {}",
        model.user_id, model.status
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        id: Set(model.id),
        user_id: Set(model.user_id),
        google_user_id: Set(model.google_user_id),
        google_email: Set(model.google_email),
        spreadsheet_id: Set(model.spreadsheet_id),
        sheet_id: Set(model.sheet_id),
        sheet_title: Set(model.sheet_title),
        access_token: Set(model.access_token),
        refresh_token: Set(model.refresh_token),
        access_token_expires_at: Set(model.access_token_expires_at),
        scopes: Set(model.scopes),
        status: Set(model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    let on_conflict = OnConflict::column(Column::UserId)
        .update_columns([
            Column::GoogleUserId,
            Column::GoogleEmail,
            Column::SpreadsheetId,
            Column::SheetId,
            Column::SheetTitle,
            Column::AccessToken,
            Column::RefreshToken,
            Column::AccessTokenExpiresAt,
            Column::Scopes,
            Column::Status,
            Column::UpdatedAt,
        ])
        .to_owned();

    Ok(Entity::insert(active_model)
        .on_conflict(on_conflict)
        .exec_with_returning(db)
        .await?)
}

/// Finds the connection owned by `user_id`, if any.
pub async fn find_by_user(db: &DatabaseConnection, user_id: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::connection_status::ConnectionStatus;
    use entity::Id;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    fn test_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            user_id: "user-1".to_string(),
            google_user_id: "google-123".to_string(),
            google_email: Some("test@gmail.com".to_string()),
            spreadsheet_id: None,
            sheet_id: None,
            sheet_title: None,
            access_token: "access-token".to_string(),
            refresh_token: Some("refresh-token".to_string()),
            access_token_expires_at: now.into(),
            scopes: "openid email https://www.googleapis.com/auth/spreadsheets".to_string(),
            status: ConnectionStatus::Active,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn upsert_by_user_returns_the_stored_connection() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = upsert_by_user(&db, model.clone()).await?;

        assert_eq!(result.user_id, "user-1");
        assert_eq!(result.status, ConnectionStatus::Active);
        Ok(())
    }

    #[tokio::test]
    async fn upsert_by_user_issues_on_conflict_update_keyed_by_user() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        upsert_by_user(&db, model).await?;

        let log: Vec<Transaction> = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        // Debug output escapes quotes inside the SQL string.
        let sql = format!("{:?}", log[0]).replace("\\\"", "\"");
        assert!(sql.contains(r#"ON CONFLICT ("user_id") DO UPDATE"#), "{sql}");
        assert!(sql.contains("RETURNING"), "{sql}");
        assert!(!sql.contains(r#""created_at" = "excluded"."created_at""#), "{sql}");
        Ok(())
    }

    #[tokio::test]
    async fn find_by_user_returns_none_when_not_found() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = find_by_user(&db, "nobody").await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_user_returns_model_when_found() -> Result<(), Error> {
        let model = test_model();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = find_by_user(&db, &model.user_id).await?;
        assert_eq!(result, Some(model));
        Ok(())
    }
}
