//! In-memory cache repository.
//!
//! Suitable for unit tests and for running the agenda tool without a
//! persistent store. All data lives in a `HashMap` behind a `RwLock`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use parking_lot::RwLock;

use crate::db::checksum::entries_checksum;
use crate::db::models::{CacheMetadata, CachedEntry};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, ScheduleCacheRepository,
};
use crate::models::ScheduleEntry;

/// In-memory cache repository.
///
/// Cloning shares the underlying storage.
///
/// # Example
/// ```
/// use timetable::db::repositories::LocalRepository;
/// use timetable::db::ScheduleCacheRepository;
///
/// let repo = LocalRepository::new();
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let cached = rt.block_on(repo.has_cached_schedule("ИКБО-60-23")).unwrap();
/// assert!(!cached);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    rows: HashMap<String, CachedEntry>,
    metadata: HashMap<String, CacheMetadata>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            metadata: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing storage failures.
    ///
    /// While unhealthy, every operation except `health_check` fails with a
    /// connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.rows.clear();
        data.metadata.clear();
    }

    /// Total number of cached rows across all groups.
    pub fn row_count(&self) -> usize {
        self.data.read().rows.len()
    }

    fn group_entries(data: &LocalData, group: &str) -> Vec<ScheduleEntry> {
        let mut rows: Vec<&CachedEntry> = data.rows.values().filter(|r| r.group == group).collect();
        rows.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        rows.into_iter().map(CachedEntry::to_entry).collect()
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

#[async_trait]
impl ScheduleCacheRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_group_schedule(
        &self,
        group: &str,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<CacheMetadata> {
        self.ensure_healthy("store_group_schedule")?;
        let now = Utc::now();

        let mut data = self.data.write();
        for entry in entries {
            let row = CachedEntry::from_entry(group, entry, now);
            data.rows.insert(row.id.clone(), row);
        }
        // Rows kept from earlier stores count toward both fields.
        let stored = Self::group_entries(&data, group);
        let entry_count = stored.len();
        let checksum = entries_checksum(&stored)
            .map_err(|e| RepositoryError::from(e).with_operation("store_group_schedule"))?;

        let metadata = CacheMetadata {
            group: group.to_string(),
            entry_count,
            checksum,
            last_updated: now,
        };
        data.metadata.insert(group.to_string(), metadata.clone());
        debug!(
            "Cached {} entries for group {} ({} total)",
            entries.len(),
            group,
            entry_count
        );
        Ok(metadata)
    }

    async fn get_group_schedule(&self, group: &str) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.ensure_healthy("get_group_schedule")?;
        Ok(Self::group_entries(&self.data.read(), group))
    }

    async fn has_cached_schedule(&self, group: &str) -> RepositoryResult<bool> {
        self.ensure_healthy("has_cached_schedule")?;
        Ok(self.data.read().rows.values().any(|r| r.group == group))
    }

    async fn list_cached_groups(&self) -> RepositoryResult<Vec<String>> {
        self.ensure_healthy("list_cached_groups")?;
        let groups: BTreeSet<String> = self
            .data
            .read()
            .rows
            .values()
            .map(|r| r.group.clone())
            .collect();
        Ok(groups.into_iter().collect())
    }

    async fn get_cache_metadata(&self, group: &str) -> RepositoryResult<Option<CacheMetadata>> {
        self.ensure_healthy("get_cache_metadata")?;
        Ok(self.data.read().metadata.get(group).cloned())
    }

    async fn clear_group(&self, group: &str) -> RepositoryResult<usize> {
        self.ensure_healthy("clear_group")?;
        let mut data = self.data.write();
        let before = data.rows.len();
        data.rows.retain(|_, r| r.group != group);
        data.metadata.remove(group);
        Ok(before - data.rows.len())
    }
}
