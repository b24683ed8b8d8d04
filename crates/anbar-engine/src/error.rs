use anbar_core::directory::DirectoryError;
use anbar_core::ident::{UserId, WarehouseId};
use anbar_core::resolver::ResolveError;
use anbar_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("warehouse {0} not found")]
    WarehouseNotFound(WarehouseId),

    #[error("user {user} does not hold supervisor access on warehouse {warehouse}")]
    Unauthorized { user: UserId, warehouse: WarehouseId },

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ResolveError> for EngineError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::Directory(d) => EngineError::Directory(d),
            ResolveError::Storage(s) => EngineError::Storage(StorageError::Internal(s)),
        }
    }
}
