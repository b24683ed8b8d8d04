use std::fmt;

use chrono::{DateTime, Utc};

use crate::ident::{UserId, WarehouseId};
use crate::tier::GrantTier;

/// A delegated access record for one (user, warehouse) pair.
///
/// At most one record exists per pair. Revocation archives the record
/// (`active = false`) instead of deleting it, so the pair can be re-granted
/// in place and the history stays available for audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationGrant {
    pub warehouse: WarehouseId,
    pub user: UserId,
    pub tier: GrantTier,
    pub active: bool,
    pub granted_by: UserId,
    pub granted_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<UserId>,
}

impl fmt::Display for DelegationGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.warehouse, self.tier, self.user)?;
        if !self.active {
            write!(f, " (revoked)")?;
        }
        Ok(())
    }
}
