//! Conversion of external schedule formats into [`ScheduleEntry`](crate::models::ScheduleEntry) values.

pub mod ical_parser;
pub mod json_parser;

pub use ical_parser::{parse_icalendar, parse_icalendar_file};
pub use json_parser::{parse_schedule_json, parse_schedule_json_str};
