#![allow(dead_code)]

use chrono::NaiveDate;

pub const GROUP: &str = "ИКБО-60-23";

/// A Monday-heavy group schedule as returned by the schedule server.
///
/// - BPM: biweekly from 2025-09-01 at 12:40, skipping 2025-10-13
/// - Databases: weekly from 2025-09-08 at 16:20 until 2025-12-22
/// - Physical education: one-off on 2025-09-08 at 10:40
/// - Elective: weekly from 2025-09-15 at 16:00 (off the current grid)
pub const SERVER_RESPONSE: &str = r#"[
  {
    "id": 1,
    "discipline": "Business process modelling",
    "lessonType": "LK",
    "startTime": "2025-09-01T12:40:00",
    "endTime": "2025-09-01T14:10:00",
    "room": "A-9 (V-78)",
    "teacher": "Karamyshev A. N.",
    "groups": ["ИКБО-60-23", "ИКБО-62-23"],
    "groupsSummary": "ИКБО-60-23, ИКБО-62-23",
    "description": null,
    "recurrence": {"frequency": "WEEKLY", "interval": 2, "until": "2025-12-30T20:59:59"},
    "exceptions": ["2025-10-13"]
  },
  {
    "id": 2,
    "discipline": "Databases",
    "lessonType": "PR",
    "startTime": "2025-09-08T16:20:00",
    "endTime": "2025-09-08T17:50:00",
    "room": "A-424-1",
    "teacher": "Semykina N. A.",
    "groups": ["ИКБО-60-23"],
    "groupsSummary": "ИКБО-60-23",
    "description": "null",
    "recurrence": {"frequency": "WEEKLY", "interval": 1, "until": "2025-12-22T23:59:59"}
  },
  {
    "id": 3,
    "discipline": "Physical education",
    "lessonType": "PR",
    "startTime": "2025-09-08T10:40:00",
    "endTime": "2025-09-08T12:10:00",
    "room": "Gym",
    "teacher": "",
    "groups": ["ИКБО-60-23"],
    "groupsSummary": "ИКБО-60-23"
  },
  {
    "id": 4,
    "discipline": "Elective",
    "lessonType": "LAB",
    "startTime": "2025-09-15T16:00:00",
    "endTime": "2025-09-15T17:30:00",
    "room": "B-101",
    "teacher": "Ivanov I. I.",
    "groups": ["ИКБО-60-23"],
    "groupsSummary": "ИКБО-60-23",
    "recurrence": {"frequency": "WEEKLY"}
  }
]"#;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}
