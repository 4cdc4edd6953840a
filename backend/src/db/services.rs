//! Cache-or-network loading of group schedules.
//!
//! ```text
//! ┌──────────────────────────┐
//! │  load_group_schedule     │
//! └────────────┬─────────────┘
//!              │ fetch
//! ┌────────────▼─────────────┐   ok    ┌───────────────────────────┐
//! │  ScheduleSource          ├────────►│ store in cache, return it │
//! └────────────┬─────────────┘         └───────────────────────────┘
//!              │ error
//! ┌────────────▼─────────────┐
//! │  ScheduleCacheRepository │ cached copy, or ConnectionError
//! └──────────────────────────┘
//! ```

use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, ScheduleCacheRepository};
use crate::models::ScheduleEntry;

/// Remote provider of group schedules, typically the schedule server.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch_group_schedule(&self, group: &str) -> anyhow::Result<Vec<ScheduleEntry>>;
}

/// Where a loaded schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOrigin {
    Network,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSchedule {
    pub group: String,
    pub origin: ScheduleOrigin,
    pub entries: Vec<ScheduleEntry>,
}

/// Pass-through to the repository's health check.
pub async fn health_check<R>(repo: &R) -> RepositoryResult<bool>
where
    R: ScheduleCacheRepository + ?Sized,
{
    repo.health_check().await
}

/// Load the schedule of `group`, preferring fresh data from `source`.
///
/// 1. Fetch from `source`. On success, store the result in `repo` and return
///    it. A failed cache write is logged and does not fail the load.
/// 2. On fetch failure, return the cached copy if the group has one.
/// 3. Otherwise fail with `RepositoryError::ConnectionError`.
///
/// # Errors
/// `ValidationError` for a blank group identifier.
pub async fn load_group_schedule<R, S>(
    repo: &R,
    source: &S,
    group: &str,
) -> RepositoryResult<LoadedSchedule>
where
    R: ScheduleCacheRepository + ?Sized,
    S: ScheduleSource + ?Sized,
{
    let group = group.trim();
    if group.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "group identifier must not be blank",
            ErrorContext::new("load_group_schedule").with_entity("group"),
        ));
    }

    let fetch_error = match source.fetch_group_schedule(group).await {
        Ok(entries) => {
            info!("Fetched {} entries for group {}", entries.len(), group);
            if let Err(e) = repo.store_group_schedule(group, &entries).await {
                warn!("Failed to cache schedule for group {}: {}", group, e);
            }
            return Ok(LoadedSchedule {
                group: group.to_string(),
                origin: ScheduleOrigin::Network,
                entries,
            });
        }
        Err(e) => e,
    };

    warn!(
        "Fetching schedule for group {} failed: {:#}; trying cache",
        group, fetch_error
    );

    // A cache that cannot even be queried counts as empty.
    if repo.has_cached_schedule(group).await.unwrap_or(false) {
        let entries = repo
            .get_group_schedule(group)
            .await
            .map_err(|e| e.with_operation("load_group_schedule"))?;
        info!("Serving {} cached entries for group {}", entries.len(), group);
        return Ok(LoadedSchedule {
            group: group.to_string(),
            origin: ScheduleOrigin::Cache,
            entries,
        });
    }

    Err(RepositoryError::connection_with_context(
        format!("no network and no cached schedule for group {}", group),
        ErrorContext::new("load_group_schedule")
            .with_entity("group")
            .with_entity_id(group)
            .with_details(format!("{:#}", fetch_error)),
    ))
}

#[cfg(all(test, feature = "local-repo"))]
#[path = "services_tests.rs"]
mod services_tests;
