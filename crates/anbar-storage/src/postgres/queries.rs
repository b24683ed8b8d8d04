use chrono::{DateTime, Utc};
use uuid::Uuid;

use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::tier::GrantTier;

use crate::traits::StorageError;

fn to_storage_error(e: sqlx::Error) -> StorageError {
    StorageError::Internal(e.to_string())
}

#[derive(sqlx::FromRow)]
struct GrantRow {
    warehouse_id: Uuid,
    user_id: Uuid,
    tier: String,
    active: bool,
    granted_by: Uuid,
    granted_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    revoked_by: Option<Uuid>,
}

impl GrantRow {
    fn into_grant(self) -> Result<DelegationGrant, StorageError> {
        let tier = GrantTier::parse(&self.tier)
            .ok_or_else(|| StorageError::Internal(format!("unknown tier value: {}", self.tier)))?;
        Ok(DelegationGrant {
            warehouse: WarehouseId::new(self.warehouse_id),
            user: UserId::new(self.user_id),
            tier,
            active: self.active,
            granted_by: UserId::new(self.granted_by),
            granted_at: self.granted_at,
            revoked_at: self.revoked_at,
            revoked_by: self.revoked_by.map(UserId::new),
        })
    }
}

#[derive(sqlx::FromRow)]
struct UpsertedRow {
    warehouse_id: Uuid,
    user_id: Uuid,
    tier: String,
    active: bool,
    granted_by: Uuid,
    granted_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    revoked_by: Option<Uuid>,
    was_created: bool,
}

const GRANT_COLUMNS: &str =
    "warehouse_id, user_id, tier, active, granted_by, granted_at, revoked_at, revoked_by";

/// Single-statement create-or-update keyed on the unique pair constraint.
/// A racing insert degrades into the DO UPDATE arm, so the loser sees an
/// update instead of a uniqueness error. `granted_at` is only written on
/// insert; `xmax = 0` distinguishes a fresh row from an updated one.
pub async fn upsert_grant<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    warehouse: WarehouseId,
    user: UserId,
    tier: GrantTier,
    granted_by: UserId,
) -> Result<(DelegationGrant, bool), StorageError> {
    let query = format!(
        r#"
        INSERT INTO delegation_grants (warehouse_id, user_id, tier, granted_by)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (warehouse_id, user_id) DO UPDATE SET
            tier = EXCLUDED.tier,
            granted_by = EXCLUDED.granted_by,
            active = TRUE,
            revoked_at = NULL,
            revoked_by = NULL
        RETURNING {GRANT_COLUMNS}, (xmax = 0) AS was_created
        "#
    );

    let row: UpsertedRow = sqlx::query_as(&query)
        .bind(warehouse.as_uuid())
        .bind(user.as_uuid())
        .bind(tier.as_str())
        .bind(granted_by.as_uuid())
        .fetch_one(executor)
        .await
        .map_err(to_storage_error)?;

    let was_created = row.was_created;
    let grant = GrantRow {
        warehouse_id: row.warehouse_id,
        user_id: row.user_id,
        tier: row.tier,
        active: row.active,
        granted_by: row.granted_by,
        granted_at: row.granted_at,
        revoked_at: row.revoked_at,
        revoked_by: row.revoked_by,
    }
    .into_grant()?;

    Ok((grant, was_created))
}

/// Archive the pair's active record. Returns the archived record, or `None`
/// when no active record matched (absent or already revoked).
pub async fn revoke_active_grant<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    warehouse: WarehouseId,
    user: UserId,
    revoked_by: UserId,
) -> Result<Option<DelegationGrant>, StorageError> {
    let query = format!(
        r#"
        UPDATE delegation_grants
        SET active = FALSE, revoked_at = now(), revoked_by = $3
        WHERE warehouse_id = $1 AND user_id = $2 AND active
        RETURNING {GRANT_COLUMNS}
        "#
    );

    let row: Option<GrantRow> = sqlx::query_as(&query)
        .bind(warehouse.as_uuid())
        .bind(user.as_uuid())
        .bind(revoked_by.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(to_storage_error)?;

    row.map(GrantRow::into_grant).transpose()
}

pub async fn find_grant<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    warehouse: WarehouseId,
    user: UserId,
) -> Result<Option<DelegationGrant>, StorageError> {
    let query = format!(
        r#"
        SELECT {GRANT_COLUMNS}
        FROM delegation_grants
        WHERE warehouse_id = $1 AND user_id = $2
        "#
    );

    let row: Option<GrantRow> = sqlx::query_as(&query)
        .bind(warehouse.as_uuid())
        .bind(user.as_uuid())
        .fetch_optional(executor)
        .await
        .map_err(to_storage_error)?;

    row.map(GrantRow::into_grant).transpose()
}

pub async fn active_grants_for_user<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    user: UserId,
) -> Result<Vec<DelegationGrant>, StorageError> {
    let query = format!(
        r#"
        SELECT {GRANT_COLUMNS}
        FROM delegation_grants
        WHERE user_id = $1 AND active
        ORDER BY granted_at
        "#
    );

    let rows: Vec<GrantRow> = sqlx::query_as(&query)
        .bind(user.as_uuid())
        .fetch_all(executor)
        .await
        .map_err(to_storage_error)?;

    rows.into_iter().map(GrantRow::into_grant).collect()
}
