use std::sync::Arc;

use crate::directory::{DirectoryError, OrgDirectory, Warehouse};
use crate::ident::User;

/// Decides whether a user owns a warehouse through its organizational unit.
///
/// Pure read; the check fails closed. Missing supervisor data on the owning
/// unit is a normal outcome (`false`), not an error.
pub struct OwnershipChecker<D: OrgDirectory> {
    directory: Arc<D>,
}

impl<D: OrgDirectory> OwnershipChecker<D> {
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// True when the user is the owning unit's primary supervisor, one of
    /// its co-supervisors, or a member of that same unit holding a
    /// supervisory title.
    pub async fn is_owner(&self, user: &User, warehouse: &Warehouse) -> Result<bool, DirectoryError> {
        let supervisors = self.directory.unit_supervisors(warehouse.department).await?;
        if supervisors.includes(user.id) {
            return Ok(true);
        }

        Ok(user.department == Some(warehouse.department) && user.department_role.is_supervisory())
    }
}
