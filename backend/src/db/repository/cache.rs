//! Cache repository trait for per-group schedule snapshots.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::CacheMetadata;
use crate::models::ScheduleEntry;

/// Storage for the last schedule fetched for each group.
///
/// Entries are keyed by `"{group}_{start}_{discipline}"`; storing an entry
/// whose key already exists replaces it.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleCacheRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Upsert `entries` under `group` and return the refreshed metadata.
    async fn store_group_schedule(
        &self,
        group: &str,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<CacheMetadata>;

    /// All cached entries of `group`, ordered by start time.
    ///
    /// An unknown group yields an empty list.
    async fn get_group_schedule(&self, group: &str) -> RepositoryResult<Vec<ScheduleEntry>>;

    async fn has_cached_schedule(&self, group: &str) -> RepositoryResult<bool>;

    /// Distinct group identifiers with at least one cached entry, sorted.
    async fn list_cached_groups(&self) -> RepositoryResult<Vec<String>>;

    /// Metadata of the last store for `group`, if any.
    async fn get_cache_metadata(&self, group: &str) -> RepositoryResult<Option<CacheMetadata>>;

    /// Remove every entry of `group`, returning how many were removed.
    async fn clear_group(&self, group: &str) -> RepositoryResult<usize>;
}
