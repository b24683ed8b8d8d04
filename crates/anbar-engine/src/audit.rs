use anbar_core::grant::DelegationGrant;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::tier::{RequiredTier, Tier};

pub fn audit_grant_written(grant: &DelegationGrant, created: bool) {
    tracing::info!(
        target: "audit",
        event = "delegation_granted",
        warehouse = %grant.warehouse,
        user = %grant.user,
        tier = %grant.tier,
        granted_by = %grant.granted_by,
        created = created,
        "delegation written"
    );
}

pub fn audit_grant_revoked(grant: &DelegationGrant, revoked_by: UserId) {
    tracing::info!(
        target: "audit",
        event = "delegation_revoked",
        warehouse = %grant.warehouse,
        user = %grant.user,
        revoked_by = %revoked_by,
        "delegation revoked"
    );
}

pub fn audit_self_grant_refused(warehouse: WarehouseId, target: UserId, attempted_by: UserId) {
    tracing::warn!(
        target: "audit",
        event = "self_grant_refused",
        warehouse = %warehouse,
        user = %target,
        attempted_by = %attempted_by,
        "delegation to an owner refused"
    );
}

pub fn audit_unauthorized_mutation(warehouse: WarehouseId, actor: UserId, action: &str) {
    tracing::warn!(
        target: "audit",
        event = "unauthorized_mutation",
        warehouse = %warehouse,
        actor = %actor,
        action = action,
        "mutation refused, actor lacks supervisor access"
    );
}

pub fn audit_access_denied(user: UserId, warehouse: WarehouseId, required: RequiredTier, actual: Tier) {
    tracing::info!(
        target: "audit",
        event = "access_denied",
        warehouse = %warehouse,
        user = %user,
        required = %required,
        actual = %actual,
        "operation denied at the gate"
    );
}
