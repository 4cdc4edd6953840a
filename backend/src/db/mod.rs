//! Local cache of group schedules.
//!
//! The cache keeps the last schedule fetched for each group so the day view
//! still works offline. Storage sits behind the [`ScheduleCacheRepository`]
//! trait, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (agenda CLI, embedding apps)         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Cache-or-network loading                             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use timetable::db::{services, LocalRepository, ScheduleSource};
//! use timetable::models::ScheduleEntry;
//!
//! struct Offline;
//!
//! #[async_trait::async_trait]
//! impl ScheduleSource for Offline {
//!     async fn fetch_group_schedule(&self, _group: &str) -> anyhow::Result<Vec<ScheduleEntry>> {
//!         anyhow::bail!("no network")
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = LocalRepository::new();
//! let loaded = services::load_group_schedule(&repo, &Offline, "ИКБО-60-23").await?;
//! println!("{} entries from {:?}", loaded.entries.len(), loaded.origin);
//! # Ok(())
//! # }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;

pub use checksum::{calculate_checksum, entries_checksum};
pub use models::{CacheMetadata, CachedEntry};
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, ScheduleCacheRepository};
pub use services::{load_group_schedule, LoadedSchedule, ScheduleOrigin, ScheduleSource};
