use std::sync::Arc;

use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::resolver::{GrantReader, ResolveError};
use anbar_storage::DelegationStore;

/// Exposes any [`DelegationStore`] through the resolver's read-only view.
pub struct StoreGrantReader<S: DelegationStore> {
    store: Arc<S>,
}

impl<S: DelegationStore> StoreGrantReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: DelegationStore> GrantReader for StoreGrantReader<S> {
    async fn find_grant(
        &self,
        warehouse: WarehouseId,
        user: UserId,
    ) -> Result<Option<DelegationGrant>, ResolveError> {
        self.store
            .find(warehouse, user)
            .await
            .map_err(|e| ResolveError::Storage(e.to_string()))
    }

    async fn active_grants_for(&self, user: UserId) -> Result<Vec<DelegationGrant>, ResolveError> {
        self.store
            .active_grants_for(user)
            .await
            .map_err(|e| ResolveError::Storage(e.to_string()))
    }
}
