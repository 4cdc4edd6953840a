//! Repository trait and error types for the schedule cache.

pub mod cache;
pub mod error;

pub use cache::ScheduleCacheRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
