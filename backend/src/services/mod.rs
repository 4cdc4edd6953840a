//! Service layer: pure resolution logic over in-memory schedule entries.
//!
//! Nothing here performs I/O. Callers pass entries, a date and a timetable
//! explicitly and get back freshly computed values.

pub mod academic_week;
pub mod agenda;
pub mod assembly;
pub mod recurrence;
pub mod view;

pub use academic_week::{
    academic_week_number, week_parity, weeks_between, AcademicCalendar, Semester, WeekParity,
};
pub use agenda::{build_agenda, Agenda, AgendaPager, DAYS_PER_PAGE, DEFAULT_AGENDA_DAYS};
pub use assembly::{
    assemble_day, assemble_dense, assemble_sparse, AssemblyMode, AssemblyOptions, UnmatchedPolicy,
};
pub use recurrence::{filter_for_date, in_recurrence, is_exception, occurs_on};
pub use view::ViewState;
