//! # Timetable
//!
//! Class-schedule resolution for a university timetable client.
//!
//! Given a group's schedule entries (one-off or weekly recurring lessons), the
//! crate answers "what happens on this date": which entries occur, how they
//! lay out over the fixed lesson/break grid, and which academic week the date
//! falls into.
//!
//! ## Features
//!
//! - **Recurrence**: weekly rules with interval, end bound and exception dates
//! - **Day assembly**: dense (every slot, empty placeholders) or sparse
//!   (lessons only, canonical breaks between adjacent lessons) agendas
//! - **Academic weeks**: semester week numbers and odd/even parity
//! - **Parsing**: server JSON responses and iCalendar feeds
//! - **Caching**: per-group offline cache behind a repository trait
//!
//! ## Architecture
//!
//! - [`models`]: schedule entries, lesson grid and assembled days
//! - [`services`]: pure resolution logic (recurrence, assembly, weeks, agenda)
//! - [`parsing`]: conversion of external formats into entries
//! - [`db`]: cache repository pattern and cache-or-network loading
//! - [`config`]: TOML configuration of the grid and calendar
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use timetable::models::{LessonType, RecurrenceRule, ScheduleEntry, Timetable};
//! use timetable::services::{assemble_day, AssemblyOptions};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
//! let lecture = ScheduleEntry::new(
//!     "Databases",
//!     LessonType::Lecture,
//!     monday.and_hms_opt(16, 20, 0).unwrap(),
//!     monday.and_hms_opt(17, 50, 0).unwrap(),
//! )
//! .with_recurrence(RecurrenceRule::weekly(1));
//!
//! let next_monday = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
//! let day = assemble_day(&[lecture], next_monday, &Timetable::default(), AssemblyOptions::dense())?;
//! assert_eq!(day.lessons().nth(4).map(|e| e.discipline.as_str()), Some("Databases"));
//! # Ok::<(), timetable::ScheduleError>(())
//! ```

// RepositoryError carries structured context.
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod parsing;
pub mod services;

pub use config::TimetableConfig;
pub use error::{ScheduleError, ScheduleResult};
pub use models::{DayAssembly, DayItem, ScheduleEntry, Timetable};
pub use services::{assemble_day, build_agenda, AcademicCalendar, AssemblyOptions, ViewState};
