//! Parsing of the schedule server's JSON response.
//!
//! The server returns a flat array of lessons:
//!
//! ```json
//! [{
//!   "id": 17,
//!   "discipline": "Databases",
//!   "lessonType": "LK",
//!   "startTime": "2025-09-01T12:40:00",
//!   "endTime": "2025-09-01T14:10:00",
//!   "room": "A-9",
//!   "teacher": "Semykina N. A.",
//!   "groups": ["IKBO-60-23"],
//!   "groupsSummary": "IKBO-60-23",
//!   "description": null,
//!   "recurrence": {"frequency": "WEEKLY", "interval": 2, "until": "2025-12-30T20:59:59"},
//!   "exceptions": ["2025-12-22"]
//! }]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};

use crate::models::{summarize_groups, Frequency, LessonType, RecurrenceRule, ScheduleEntry};

/// Accepts either a string or an integer identifier.
fn deserialize_entry_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        String(String),
        Int(i64),
    }

    Ok(
        Option::<StringOrInt>::deserialize(deserializer)?.map(|id| match id {
            StringOrInt::String(s) => s,
            StringOrInt::Int(i) => i.to_string(),
        }),
    )
}

/// Raw recurrence object
#[derive(Debug, Deserialize)]
struct RawRecurrence {
    frequency: Option<String>,
    interval: Option<i32>,
    until: Option<NaiveDateTime>,
}

/// Raw JSON structure as it comes from the server
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScheduleEntry {
    #[serde(default, deserialize_with = "deserialize_entry_id")]
    id: Option<String>,
    discipline: String,
    lesson_type: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    #[serde(default)]
    room: Option<String>,
    #[serde(default)]
    teacher: Option<String>,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    groups_summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    recurrence: Option<RawRecurrence>,
    #[serde(default)]
    exceptions: Vec<NaiveDate>,
}

impl RawScheduleEntry {
    fn into_entry(self) -> ScheduleEntry {
        let recurrence = self.recurrence.and_then(|raw| {
            if raw.frequency.is_none() && raw.interval.is_none() && raw.until.is_none() {
                return None;
            }
            if let Some(interval) = raw.interval.filter(|n| *n < 1) {
                warn!(
                    "Lesson '{}' has recurrence interval {}, resolving it as weekly",
                    self.discipline, interval
                );
            }
            Some(RecurrenceRule {
                frequency: raw.frequency.map(Frequency::from).unwrap_or_default(),
                interval: raw.interval,
                until: raw.until,
            })
        });

        let groups_summary = self
            .groups_summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| summarize_groups(&self.groups));

        ScheduleEntry {
            id: self.id,
            discipline: self.discipline,
            lesson_type: LessonType::from(self.lesson_type),
            start: self.start_time,
            end: self.end_time,
            room: self.room.unwrap_or_default(),
            teacher: self.teacher.unwrap_or_default(),
            groups: self.groups,
            groups_summary,
            description: self
                .description
                .filter(|d| !d.trim().is_empty() && d.trim() != "null"),
            recurrence,
            exceptions: self.exceptions,
        }
    }
}

/// Parse a server response body into validated schedule entries.
///
/// # Errors
/// Fails when the body is not a JSON array of lesson objects, or when an
/// entry violates [`ScheduleEntry::validate`].
pub fn parse_schedule_json_str(json: &str) -> Result<Vec<ScheduleEntry>> {
    let raw: Vec<RawScheduleEntry> =
        serde_json::from_str(json).context("Failed to deserialize schedule JSON")?;

    let entries = raw
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let entry = raw.into_entry();
            entry
                .validate()
                .with_context(|| format!("Invalid schedule entry at index {}", index))?;
            Ok(entry)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} schedule entries from JSON", entries.len());
    Ok(entries)
}

/// Parse a server response saved to disk.
pub fn parse_schedule_json(json_path: &Path) -> Result<Vec<ScheduleEntry>> {
    let json_content = std::fs::read_to_string(json_path)
        .with_context(|| format!("Failed to read JSON file: {}", json_path.display()))?;

    let entries = parse_schedule_json_str(&json_content)?;
    info!(
        "Loaded {} schedule entries from {}",
        entries.len(),
        json_path.display()
    );
    Ok(entries)
}

#[cfg(test)]
#[path = "json_parser_tests.rs"]
mod json_parser_tests;
