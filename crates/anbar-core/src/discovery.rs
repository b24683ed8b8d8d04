use std::sync::Arc;

use crate::directory::{OrgDirectory, Warehouse};
use crate::ident::{Role, User};
use crate::policy::OverridePolicy;
use crate::resolver::{GrantReader, ResolveError};
use crate::tier::Tier;

/// One entry of a listing screen: a warehouse plus the tier that grants
/// access to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibleWarehouse {
    pub warehouse: Warehouse,
    pub tier: Tier,
}

/// Enumerates every warehouse a user may open, for listing screens.
///
/// Entries are deduplicated by warehouse identity; a supervisor entry wins
/// over a delegated one for the same warehouse even if a stray delegation
/// row exists for an owner.
pub struct DiscoveryService<D: OrgDirectory, G: GrantReader> {
    directory: Arc<D>,
    grants: Arc<G>,
    policy: OverridePolicy,
}

impl<D: OrgDirectory, G: GrantReader> DiscoveryService<D, G> {
    pub fn new(directory: Arc<D>, grants: Arc<G>, policy: OverridePolicy) -> Self {
        Self {
            directory,
            grants,
            policy,
        }
    }

    pub async fn list_accessible(&self, user: &User) -> Result<Vec<AccessibleWarehouse>, ResolveError> {
        if self.policy.is_excluded(user.role) {
            return Ok(Vec::new());
        }

        if self.policy.is_override(user) {
            let catalog = self.directory.active_warehouses().await?;
            return Ok(catalog
                .into_iter()
                .map(|warehouse| AccessibleWarehouse {
                    warehouse,
                    tier: Tier::Administrative,
                })
                .collect());
        }

        if user.role != Role::Employee {
            return Ok(Vec::new());
        }

        let mut entries: Vec<AccessibleWarehouse> = Vec::new();

        let mut units = self.directory.supervised_units(user.id).await?;
        if let Some(own) = user.department
            && user.department_role.is_supervisory()
            && !units.contains(&own)
        {
            units.push(own);
        }

        for unit in units {
            if let Some(warehouse) = self.directory.warehouse_of_unit(unit).await?
                && warehouse.active
                && !entries.iter().any(|e| e.warehouse.id == warehouse.id)
            {
                entries.push(AccessibleWarehouse {
                    warehouse,
                    tier: Tier::Supervisor,
                });
            }
        }

        for grant in self.grants.active_grants_for(user.id).await? {
            if entries.iter().any(|e| e.warehouse.id == grant.warehouse) {
                continue;
            }
            let Some(warehouse) = self.directory.warehouse(grant.warehouse).await? else {
                continue;
            };
            if !warehouse.active {
                continue;
            }
            entries.push(AccessibleWarehouse {
                warehouse,
                tier: grant.tier.as_tier(),
            });
        }

        Ok(entries)
    }
}
