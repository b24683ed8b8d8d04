use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::tier::GrantTier;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("internal storage error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevokeOutcome {
    Revoked(DelegationGrant),
    AlreadyRevoked,
    NotFound,
}

/// Persistence of delegation records.
///
/// Implementations uphold one hard invariant: at most one record exists per
/// (warehouse, user) pair, active or not, even under concurrent `upsert`
/// calls. A caller racing another grant observes an update, never a
/// uniqueness failure.
pub trait DelegationStore: Send + Sync {
    /// Create-or-update the record for the pair. A new record is created
    /// active with the given tier; an existing one (active or revoked) is
    /// updated in place: tier replaced, reactivated, revocation stamps
    /// cleared, grantor restamped. `granted_at` keeps its original value on
    /// update. The `bool` reports whether a record was created.
    fn upsert(
        &self,
        warehouse: WarehouseId,
        user: UserId,
        tier: GrantTier,
        granted_by: UserId,
    ) -> impl Future<Output = Result<(DelegationGrant, bool), StorageError>> + Send;

    /// Soft-revoke the pair's record. Revoking an already-inactive record
    /// leaves its revocation stamps untouched.
    fn revoke(
        &self,
        warehouse: WarehouseId,
        user: UserId,
        revoked_by: UserId,
    ) -> impl Future<Output = Result<RevokeOutcome, StorageError>> + Send;

    /// The pair's record in any state.
    fn find(
        &self,
        warehouse: WarehouseId,
        user: UserId,
    ) -> impl Future<Output = Result<Option<DelegationGrant>, StorageError>> + Send;

    /// All active records held by the user, for discovery.
    fn active_grants_for(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<DelegationGrant>, StorageError>> + Send;
}
