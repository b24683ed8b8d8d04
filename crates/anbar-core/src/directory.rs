use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ident::{DepartmentId, UserId, WarehouseId};

/// A protected warehouse. Identity and owning unit are immutable; the
/// `active` flag controls whether the warehouse is discoverable at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub department: DepartmentId,
    pub active: bool,
}

impl Warehouse {
    pub fn new(id: WarehouseId, department: DepartmentId) -> Self {
        Self {
            id,
            department,
            active: true,
        }
    }
}

/// Supervisor references of one organizational unit: a single primary
/// reference and/or a co-supervisor set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSupervisors {
    pub primary: Option<UserId>,
    pub co_supervisors: Vec<UserId>,
}

impl UnitSupervisors {
    pub fn includes(&self, user: UserId) -> bool {
        self.primary == Some(user) || self.co_supervisors.contains(&user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("internal directory error: {0}")]
    Internal(String),
}

/// Read-only view of the organizational data owned by the surrounding
/// application. A unit unknown to the directory yields empty supervisor
/// data, not an error; only a transport failure is an `Err`.
pub trait OrgDirectory: Send + Sync {
    fn warehouse(
        &self,
        id: WarehouseId,
    ) -> impl Future<Output = Result<Option<Warehouse>, DirectoryError>> + Send;

    fn warehouse_of_unit(
        &self,
        unit: DepartmentId,
    ) -> impl Future<Output = Result<Option<Warehouse>, DirectoryError>> + Send;

    fn unit_supervisors(
        &self,
        unit: DepartmentId,
    ) -> impl Future<Output = Result<UnitSupervisors, DirectoryError>> + Send;

    fn supervised_units(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<DepartmentId>, DirectoryError>> + Send;

    fn active_warehouses(&self) -> impl Future<Output = Result<Vec<Warehouse>, DirectoryError>> + Send;
}

#[derive(Debug, Default)]
struct DirectoryState {
    warehouses: Vec<Warehouse>,
    supervisors: HashMap<DepartmentId, UnitSupervisors>,
}

/// Directory backed by process memory, for embeddings that already hold
/// their organizational data in RAM and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_warehouse(&self, warehouse: Warehouse) {
        let mut state = self.state.lock().unwrap();
        state.warehouses.retain(|w| w.id != warehouse.id);
        state.warehouses.push(warehouse);
    }

    pub fn deactivate_warehouse(&self, id: WarehouseId) {
        let mut state = self.state.lock().unwrap();
        if let Some(warehouse) = state.warehouses.iter_mut().find(|w| w.id == id) {
            warehouse.active = false;
        }
    }

    pub fn set_primary_supervisor(&self, unit: DepartmentId, user: UserId) {
        let mut state = self.state.lock().unwrap();
        state.supervisors.entry(unit).or_default().primary = Some(user);
    }

    pub fn add_co_supervisor(&self, unit: DepartmentId, user: UserId) {
        let mut state = self.state.lock().unwrap();
        let entry = state.supervisors.entry(unit).or_default();
        if !entry.co_supervisors.contains(&user) {
            entry.co_supervisors.push(user);
        }
    }
}

impl OrgDirectory for InMemoryDirectory {
    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, DirectoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.warehouses.iter().find(|w| w.id == id).cloned())
    }

    async fn warehouse_of_unit(
        &self,
        unit: DepartmentId,
    ) -> Result<Option<Warehouse>, DirectoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.warehouses.iter().find(|w| w.department == unit).cloned())
    }

    async fn unit_supervisors(&self, unit: DepartmentId) -> Result<UnitSupervisors, DirectoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.supervisors.get(&unit).cloned().unwrap_or_default())
    }

    async fn supervised_units(&self, user: UserId) -> Result<Vec<DepartmentId>, DirectoryError> {
        let state = self.state.lock().unwrap();
        let units = state
            .supervisors
            .iter()
            .filter(|(_, sup)| sup.includes(user))
            .map(|(unit, _)| *unit)
            .collect();
        Ok(units)
    }

    async fn active_warehouses(&self) -> Result<Vec<Warehouse>, DirectoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.warehouses.iter().filter(|w| w.active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids() -> (WarehouseId, DepartmentId, UserId) {
        (
            WarehouseId::new(Uuid::new_v4()),
            DepartmentId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
        )
    }

    // --- UnitSupervisors ---

    #[test]
    fn includes_matches_primary_and_co_supervisors() {
        let primary = UserId::new(Uuid::new_v4());
        let co = UserId::new(Uuid::new_v4());
        let other = UserId::new(Uuid::new_v4());
        let supervisors = UnitSupervisors {
            primary: Some(primary),
            co_supervisors: vec![co],
        };

        assert!(supervisors.includes(primary));
        assert!(supervisors.includes(co));
        assert!(!supervisors.includes(other));
    }

    #[test]
    fn empty_supervisors_include_nobody() {
        let supervisors = UnitSupervisors::default();

        assert!(!supervisors.includes(UserId::new(Uuid::new_v4())));
    }

    // --- InMemoryDirectory ---

    #[tokio::test]
    async fn inserted_warehouse_can_be_looked_up() {
        let (wid, unit, _) = ids();
        let directory = InMemoryDirectory::new();
        directory.insert_warehouse(Warehouse::new(wid, unit));

        let found = directory.warehouse(wid).await.unwrap();

        assert_eq!(found, Some(Warehouse::new(wid, unit)));
    }

    #[tokio::test]
    async fn unknown_warehouse_is_none() {
        let directory = InMemoryDirectory::new();

        let found = directory.warehouse(WarehouseId::new(Uuid::new_v4())).await.unwrap();

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn warehouse_of_unit_resolves_by_department() {
        let (wid, unit, _) = ids();
        let directory = InMemoryDirectory::new();
        directory.insert_warehouse(Warehouse::new(wid, unit));

        let found = directory.warehouse_of_unit(unit).await.unwrap();

        assert_eq!(found.map(|w| w.id), Some(wid));
    }

    #[tokio::test]
    async fn unknown_unit_has_empty_supervisors() {
        let directory = InMemoryDirectory::new();

        let supervisors = directory
            .unit_supervisors(DepartmentId::new(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(supervisors, UnitSupervisors::default());
    }

    #[tokio::test]
    async fn supervised_units_covers_primary_and_co_roles() {
        let (_, unit_a, alice) = ids();
        let unit_b = DepartmentId::new(Uuid::new_v4());
        let unit_c = DepartmentId::new(Uuid::new_v4());
        let directory = InMemoryDirectory::new();
        directory.set_primary_supervisor(unit_a, alice);
        directory.add_co_supervisor(unit_b, alice);
        directory.set_primary_supervisor(unit_c, UserId::new(Uuid::new_v4()));

        let mut units = directory.supervised_units(alice).await.unwrap();
        units.sort_by_key(|u| *u.as_uuid());

        let mut expected = vec![unit_a, unit_b];
        expected.sort_by_key(|u| *u.as_uuid());
        assert_eq!(units, expected);
    }

    #[tokio::test]
    async fn co_supervisor_is_not_added_twice() {
        let (_, unit, alice) = ids();
        let directory = InMemoryDirectory::new();
        directory.add_co_supervisor(unit, alice);
        directory.add_co_supervisor(unit, alice);

        let supervisors = directory.unit_supervisors(unit).await.unwrap();

        assert_eq!(supervisors.co_supervisors.len(), 1);
    }

    #[tokio::test]
    async fn active_warehouses_excludes_deactivated() {
        let (wid_a, unit_a, _) = ids();
        let wid_b = WarehouseId::new(Uuid::new_v4());
        let unit_b = DepartmentId::new(Uuid::new_v4());
        let directory = InMemoryDirectory::new();
        directory.insert_warehouse(Warehouse::new(wid_a, unit_a));
        directory.insert_warehouse(Warehouse::new(wid_b, unit_b));
        directory.deactivate_warehouse(wid_b);

        let active = directory.active_warehouses().await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, wid_a);
    }

    #[tokio::test]
    async fn reinserting_a_warehouse_replaces_it() {
        let (wid, unit, _) = ids();
        let directory = InMemoryDirectory::new();
        directory.insert_warehouse(Warehouse::new(wid, unit));
        directory.deactivate_warehouse(wid);
        directory.insert_warehouse(Warehouse::new(wid, unit));

        let found = directory.warehouse(wid).await.unwrap().unwrap();

        assert!(found.active);
        let state_len = directory.active_warehouses().await.unwrap().len();
        assert_eq!(state_len, 1);
    }
}
