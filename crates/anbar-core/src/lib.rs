pub mod directory;
pub mod discovery;
pub mod gate;
pub mod grant;
pub mod ident;
pub mod ownership;
pub mod policy;
pub mod resolver;
pub mod tier;

pub use directory::{DirectoryError, InMemoryDirectory, OrgDirectory, UnitSupervisors, Warehouse};
pub use discovery::{AccessibleWarehouse, DiscoveryService};
pub use gate::{AuthorizationGate, Decision, Denial};
pub use grant::DelegationGrant;
pub use ident::{DepartmentId, DepartmentRole, Role, User, UserId, WarehouseId};
pub use ownership::OwnershipChecker;
pub use policy::OverridePolicy;
pub use resolver::{AccessResolver, GrantReader, ResolveError};
pub use tier::{GrantTier, RequiredTier, Tier};
