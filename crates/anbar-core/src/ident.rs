use std::fmt;

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WarehouseId(Uuid);

impl WarehouseId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for WarehouseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartmentId(Uuid);

impl DepartmentId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for DepartmentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application-wide role tag carried by every user.
///
/// `AssetManager` is the hierarchical asset-management population; it is
/// routed to its own inventory system and is excluded from warehouse
/// resolution by the default [`crate::policy::OverridePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Technician,
    AssetManager,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(Role::Employee),
            "technician" => Some(Role::Technician),
            "asset_manager" => Some(Role::AssetManager),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Employee => "employee",
            Role::Technician => "technician",
            Role::AssetManager => "asset_manager",
        };
        write!(f, "{s}")
    }
}

/// Title held within the user's own organizational unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentRole {
    Member,
    Senior,
    Manager,
}

impl DepartmentRole {
    pub fn is_supervisory(self) -> bool {
        matches!(self, DepartmentRole::Senior | DepartmentRole::Manager)
    }
}

/// A read-only snapshot of the requesting or targeted user.
///
/// Owned by the surrounding application; the engine never mutates it and
/// always receives it as an explicit argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub department: Option<DepartmentId>,
    pub department_role: DepartmentRole,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            is_staff: false,
            is_superuser: false,
            department: None,
            department_role: DepartmentRole::Member,
        }
    }

    pub fn in_department(mut self, department: DepartmentId, department_role: DepartmentRole) -> Self {
        self.department = Some(department);
        self.department_role = department_role;
        self
    }

    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }
}
