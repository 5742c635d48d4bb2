//! Storage interfaces and the in-memory backend

pub mod memory;
pub mod traits;

// Re-export the storage provider
pub use memory::MemoryStorageProvider;
pub use traits::{
    Company, CompanyChanges, CompanyStorage, StorageProvider, StoredUser, UserChanges, UserStorage,
};
