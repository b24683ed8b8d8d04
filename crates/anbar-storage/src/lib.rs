pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryDelegationStore;
pub use postgres::PostgresDelegationStore;
pub use traits::{DelegationStore, RevokeOutcome, StorageError};
