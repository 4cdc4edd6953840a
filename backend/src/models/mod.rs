pub mod day;
pub mod entry;
pub mod timetable;

pub use day::*;
pub use entry::*;
pub use timetable::*;
