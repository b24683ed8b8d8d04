use std::sync::Arc;

use crate::directory::{DirectoryError, OrgDirectory};
use crate::grant::DelegationGrant;
use crate::ident::{Role, User, UserId, WarehouseId};
use crate::ownership::OwnershipChecker;
use crate::policy::OverridePolicy;
use crate::tier::Tier;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("grant storage error: {0}")]
    Storage(String),
}

/// Read-side view of delegation records, as the resolver needs them.
pub trait GrantReader: Send + Sync {
    fn find_grant(
        &self,
        warehouse: WarehouseId,
        user: UserId,
    ) -> impl Future<Output = Result<Option<DelegationGrant>, ResolveError>> + Send;

    fn active_grants_for(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<DelegationGrant>, ResolveError>> + Send;
}

/// Resolves the effective tier for a (user, warehouse) pair.
///
/// Conditions are evaluated in strict priority order and the first match
/// wins: exclusion, resource availability, administrative override,
/// ownership, delegation. Ownership is checked before delegation so a stale
/// delegation row can never downgrade a supervisor.
pub struct AccessResolver<D: OrgDirectory, G: GrantReader> {
    directory: Arc<D>,
    grants: Arc<G>,
    ownership: OwnershipChecker<D>,
    policy: OverridePolicy,
}

impl<D: OrgDirectory, G: GrantReader> AccessResolver<D, G> {
    pub fn new(directory: Arc<D>, grants: Arc<G>, policy: OverridePolicy) -> Self {
        let ownership = OwnershipChecker::new(Arc::clone(&directory));
        Self {
            directory,
            grants,
            ownership,
            policy,
        }
    }

    pub async fn resolve(&self, user: &User, warehouse: WarehouseId) -> Result<Tier, ResolveError> {
        if self.policy.is_excluded(user.role) {
            return Ok(Tier::None);
        }

        let Some(warehouse) = self.directory.warehouse(warehouse).await? else {
            return Ok(Tier::None);
        };
        if !warehouse.active {
            return Ok(Tier::None);
        }

        if self.policy.is_override(user) {
            return Ok(Tier::Administrative);
        }

        if user.role != Role::Employee {
            return Ok(Tier::None);
        }

        if self.ownership.is_owner(user, &warehouse).await? {
            return Ok(Tier::Supervisor);
        }

        match self.grants.find_grant(warehouse.id, user.id).await? {
            Some(grant) if grant.active => Ok(grant.tier.as_tier()),
            _ => Ok(Tier::None),
        }
    }
}
