use std::sync::Arc;

use anbar_core::directory::OrgDirectory;
use anbar_core::discovery::{AccessibleWarehouse, DiscoveryService};
use anbar_core::gate::{AuthorizationGate, Decision, Denial};
use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{User, WarehouseId};
use anbar_core::ownership::OwnershipChecker;
use anbar_core::policy::OverridePolicy;
use anbar_core::resolver::AccessResolver;
use anbar_core::tier::{GrantTier, RequiredTier, Tier};
use anbar_storage::{DelegationStore, RevokeOutcome};

use crate::adapter::StoreGrantReader;
use crate::audit;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    Created(DelegationGrant),
    Updated(DelegationGrant),
    /// The target already owns the warehouse; ownership access is derived,
    /// never stored, so no record is written.
    SelfGrantNotApplicable,
}

/// The embedding boundary of the access engine.
///
/// Wires a [`DelegationStore`] and an [`OrgDirectory`] into resolution,
/// discovery and the authorization gate, and enforces the mutation
/// preconditions: only a supervisor-or-above actor may grant or revoke, and
/// owners never receive delegation records.
///
/// `resolve` and `authorize` never fail: a transport failure in either
/// collaborator is logged and treated as no access.
pub struct AccessEngine<S: DelegationStore, D: OrgDirectory> {
    store: Arc<S>,
    directory: Arc<D>,
    gate: AuthorizationGate<D, StoreGrantReader<S>>,
    discovery: DiscoveryService<D, StoreGrantReader<S>>,
    ownership: OwnershipChecker<D>,
}

impl<S: DelegationStore, D: OrgDirectory> AccessEngine<S, D> {
    pub fn new(store: Arc<S>, directory: Arc<D>, policy: OverridePolicy) -> Self {
        let reader = Arc::new(StoreGrantReader::new(Arc::clone(&store)));
        let resolver = AccessResolver::new(
            Arc::clone(&directory),
            Arc::clone(&reader),
            policy.clone(),
        );
        let discovery = DiscoveryService::new(Arc::clone(&directory), reader, policy);
        let ownership = OwnershipChecker::new(Arc::clone(&directory));

        Self {
            store,
            directory,
            gate: AuthorizationGate::new(resolver),
            discovery,
            ownership,
        }
    }

    pub async fn resolve(&self, user: &User, warehouse: WarehouseId) -> Tier {
        match self.gate.resolver().resolve(user, warehouse).await {
            Ok(tier) => tier,
            Err(e) => {
                tracing::warn!(
                    user = %user.id,
                    warehouse = %warehouse,
                    error = %e,
                    "resolution failed, failing closed"
                );
                Tier::None
            }
        }
    }

    pub async fn authorize(
        &self,
        user: &User,
        warehouse: WarehouseId,
        required: RequiredTier,
    ) -> Decision {
        let actual = self.resolve(user, warehouse).await;
        if required.allows(actual) {
            Decision::Allow(actual)
        } else {
            audit::audit_access_denied(user.id, warehouse, required, actual);
            Decision::Deny(Denial { required, actual })
        }
    }

    /// Wraps an operation so it can only run behind an `Allow`. Denial
    /// happens strictly before the operation, so no side effect precedes
    /// the check.
    pub async fn guard<T, F, Fut>(
        &self,
        user: &User,
        warehouse: WarehouseId,
        required: RequiredTier,
        op: F,
    ) -> Result<T, Denial>
    where
        F: FnOnce(Tier) -> Fut,
        Fut: Future<Output = T>,
    {
        match self.authorize(user, warehouse, required).await {
            Decision::Allow(tier) => Ok(op(tier).await),
            Decision::Deny(denial) => Err(denial),
        }
    }

    pub async fn grant(
        &self,
        warehouse: WarehouseId,
        target: &User,
        tier: GrantTier,
        granted_by: &User,
    ) -> Result<GrantOutcome, EngineError> {
        let record = self.available_warehouse(warehouse).await?;

        let grantor_tier = self.gate.resolver().resolve(granted_by, warehouse).await?;
        if grantor_tier < Tier::Supervisor {
            audit::audit_unauthorized_mutation(warehouse, granted_by.id, "grant");
            return Err(EngineError::Unauthorized {
                user: granted_by.id,
                warehouse,
            });
        }

        if self.ownership.is_owner(target, &record).await? {
            audit::audit_self_grant_refused(warehouse, target.id, granted_by.id);
            return Ok(GrantOutcome::SelfGrantNotApplicable);
        }

        let (grant, created) = self
            .store
            .upsert(warehouse, target.id, tier, granted_by.id)
            .await?;
        audit::audit_grant_written(&grant, created);

        Ok(if created {
            GrantOutcome::Created(grant)
        } else {
            GrantOutcome::Updated(grant)
        })
    }

    pub async fn revoke(
        &self,
        warehouse: WarehouseId,
        target: &User,
        revoked_by: &User,
    ) -> Result<RevokeOutcome, EngineError> {
        self.available_warehouse(warehouse).await?;

        let revoker_tier = self.gate.resolver().resolve(revoked_by, warehouse).await?;
        if revoker_tier < Tier::Supervisor {
            audit::audit_unauthorized_mutation(warehouse, revoked_by.id, "revoke");
            return Err(EngineError::Unauthorized {
                user: revoked_by.id,
                warehouse,
            });
        }

        let outcome = self.store.revoke(warehouse, target.id, revoked_by.id).await?;
        if let RevokeOutcome::Revoked(ref grant) = outcome {
            audit::audit_grant_revoked(grant, revoked_by.id);
        }
        Ok(outcome)
    }

    pub async fn list_accessible(
        &self,
        user: &User,
    ) -> Result<Vec<AccessibleWarehouse>, EngineError> {
        self.discovery
            .list_accessible(user)
            .await
            .map_err(EngineError::from)
    }

    async fn available_warehouse(
        &self,
        warehouse: WarehouseId,
    ) -> Result<anbar_core::directory::Warehouse, EngineError> {
        let record = self
            .directory
            .warehouse(warehouse)
            .await?
            .ok_or(EngineError::WarehouseNotFound(warehouse))?;
        if !record.active {
            return Err(EngineError::WarehouseNotFound(warehouse));
        }
        Ok(record)
    }
}
