use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::tier::GrantTier;

use crate::traits::{DelegationStore, RevokeOutcome, StorageError};

#[derive(Debug, Clone)]
struct StoredGrant {
    warehouse: WarehouseId,
    user: UserId,
    tier: GrantTier,
    active: bool,
    granted_by: UserId,
    granted_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
    revoked_by: Option<UserId>,
}

impl StoredGrant {
    fn to_grant(&self) -> DelegationGrant {
        DelegationGrant {
            warehouse: self.warehouse,
            user: self.user,
            tier: self.tier,
            active: self.active,
            granted_by: self.granted_by,
            granted_at: self.granted_at,
            revoked_at: self.revoked_at,
            revoked_by: self.revoked_by,
        }
    }
}

/// Store backed by process memory. The mutex serializes every mutation, so
/// concurrent upserts on the same pair linearize into create-then-update.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDelegationStore {
    state: Arc<Mutex<Vec<StoredGrant>>>,
}

impl InMemoryDelegationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelegationStore for InMemoryDelegationStore {
    async fn upsert(
        &self,
        warehouse: WarehouseId,
        user: UserId,
        tier: GrantTier,
        granted_by: UserId,
    ) -> Result<(DelegationGrant, bool), StorageError> {
        let mut rows = self.state.lock().unwrap();

        if let Some(row) = rows
            .iter_mut()
            .find(|r| r.warehouse == warehouse && r.user == user)
        {
            row.tier = tier;
            row.active = true;
            row.granted_by = granted_by;
            row.revoked_at = None;
            row.revoked_by = None;
            return Ok((row.to_grant(), false));
        }

        let row = StoredGrant {
            warehouse,
            user,
            tier,
            active: true,
            granted_by,
            granted_at: Utc::now(),
            revoked_at: None,
            revoked_by: None,
        };
        let grant = row.to_grant();
        rows.push(row);
        Ok((grant, true))
    }

    async fn revoke(
        &self,
        warehouse: WarehouseId,
        user: UserId,
        revoked_by: UserId,
    ) -> Result<RevokeOutcome, StorageError> {
        let mut rows = self.state.lock().unwrap();

        let Some(row) = rows
            .iter_mut()
            .find(|r| r.warehouse == warehouse && r.user == user)
        else {
            return Ok(RevokeOutcome::NotFound);
        };

        if !row.active {
            return Ok(RevokeOutcome::AlreadyRevoked);
        }

        row.active = false;
        row.revoked_at = Some(Utc::now());
        row.revoked_by = Some(revoked_by);
        Ok(RevokeOutcome::Revoked(row.to_grant()))
    }

    async fn find(
        &self,
        warehouse: WarehouseId,
        user: UserId,
    ) -> Result<Option<DelegationGrant>, StorageError> {
        let rows = self.state.lock().unwrap();
        Ok(rows
            .iter()
            .find(|r| r.warehouse == warehouse && r.user == user)
            .map(StoredGrant::to_grant))
    }

    async fn active_grants_for(&self, user: UserId) -> Result<Vec<DelegationGrant>, StorageError> {
        let rows = self.state.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.user == user && r.active)
            .map(StoredGrant::to_grant)
            .collect())
    }
}
