use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE TYPE sheets_link.connection_status AS ENUM ('active', 'revoked')")
            .await?;

        // One row per host application user. Re-linking overwrites the row via
        // ON CONFLICT (user_id); revoking flips status. Rows are never deleted.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS sheets_link.google_sheets_connections (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                user_id TEXT NOT NULL UNIQUE,

                google_user_id TEXT NOT NULL,
                google_email TEXT,

                spreadsheet_id TEXT,
                sheet_id BIGINT,
                sheet_title TEXT,

                access_token TEXT NOT NULL,
                refresh_token TEXT,
                access_token_expires_at TIMESTAMPTZ NOT NULL,
                scopes TEXT NOT NULL DEFAULT '',
                status sheets_link.connection_status NOT NULL DEFAULT 'active',

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS sheets_link.google_sheets_connections")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS sheets_link.connection_status")
            .await?;

        Ok(())
    }
}
