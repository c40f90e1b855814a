// Repository module structure
pub mod errors;
mod glucose_record;
mod storage;
mod user;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use glucose_record::{
    storage_now, GlucoseRecordRepository, GlucoseRecordRepositoryTrait, DEFAULT_LIST_LIMIT,
};
pub use user::UserRepository;

// In-memory repository for tests, also exported when the mock feature is enabled
#[cfg(any(test, feature = "mock"))]
mod in_memory;
#[cfg(any(test, feature = "mock"))]
pub use in_memory::InMemoryGlucoseRecordRepository;
