use sqlx::PgPool;

/// Create the delegation schema. Idempotent; the unique pair constraint is
/// the database-level backstop for the one-record-per-pair invariant.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS delegation_grants (
            id           UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            warehouse_id UUID NOT NULL,
            user_id      UUID NOT NULL,
            tier         TEXT NOT NULL,
            active       BOOLEAN NOT NULL DEFAULT TRUE,
            granted_by   UUID NOT NULL,
            granted_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
            revoked_at   TIMESTAMPTZ,
            revoked_by   UUID,
            UNIQUE (warehouse_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_grants_by_user
        ON delegation_grants (user_id, active)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_grants_by_warehouse
        ON delegation_grants (warehouse_id, active)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
