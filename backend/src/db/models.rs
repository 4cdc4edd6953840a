//! Row models stored by the cache repositories.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Frequency, LessonType, RecurrenceRule, ScheduleEntry};

/// One cached lesson of one group, with the recurrence rule flattened into
/// nullable columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    /// `"{group}_{start}_{discipline}"`
    pub id: String,
    pub group: String,
    /// Identifier assigned by the source, if it sent one.
    pub source_id: Option<String>,
    pub discipline: String,
    pub lesson_type: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub room: String,
    pub teacher: String,
    pub groups: Vec<String>,
    pub groups_summary: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub interval: Option<i32>,
    pub until: Option<NaiveDateTime>,
    pub exceptions: Vec<NaiveDate>,
    pub last_updated: DateTime<Utc>,
}

impl CachedEntry {
    pub fn cache_id(group: &str, entry: &ScheduleEntry) -> String {
        format!(
            "{}_{}_{}",
            group,
            entry.start.format("%Y-%m-%dT%H:%M:%S"),
            entry.discipline
        )
    }

    pub fn from_entry(group: &str, entry: &ScheduleEntry, last_updated: DateTime<Utc>) -> Self {
        let recurrence = entry.recurrence.as_ref();
        Self {
            id: Self::cache_id(group, entry),
            group: group.to_string(),
            source_id: entry.id.clone(),
            discipline: entry.discipline.clone(),
            lesson_type: entry.lesson_type.tag().to_string(),
            start_time: entry.start,
            end_time: entry.end,
            room: entry.room.clone(),
            teacher: entry.teacher.clone(),
            groups: entry.groups.clone(),
            groups_summary: entry.groups_summary.clone(),
            description: entry.description.clone(),
            frequency: recurrence.map(|r| r.frequency.to_string()),
            interval: recurrence.and_then(|r| r.interval),
            until: recurrence.and_then(|r| r.until),
            exceptions: entry.exceptions.clone(),
            last_updated,
        }
    }

    /// Rebuild the entry; a recurrence rule is restored when any of its
    /// columns is set.
    pub fn to_entry(&self) -> ScheduleEntry {
        let recurrence = if self.frequency.is_some() || self.interval.is_some() || self.until.is_some()
        {
            Some(RecurrenceRule {
                frequency: self
                    .frequency
                    .clone()
                    .map(Frequency::from)
                    .unwrap_or_default(),
                interval: self.interval,
                until: self.until,
            })
        } else {
            None
        };

        ScheduleEntry {
            id: self.source_id.clone(),
            discipline: self.discipline.clone(),
            lesson_type: LessonType::from(self.lesson_type.as_str()),
            start: self.start_time,
            end: self.end_time,
            room: self.room.clone(),
            teacher: self.teacher.clone(),
            groups: self.groups.clone(),
            groups_summary: self.groups_summary.clone(),
            description: self.description.clone(),
            recurrence,
            exceptions: self.exceptions.clone(),
        }
    }
}

/// Summary of what is cached for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub group: String,
    /// Rows held for the group after the last store, including rows kept
    /// from earlier stores.
    pub entry_count: usize,
    /// SHA-256 of the same rows, in the order `get_group_schedule` returns.
    pub checksum: String,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture() -> ScheduleEntry {
        let day = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        ScheduleEntry::new(
            "Databases",
            LessonType::Lecture,
            day.and_hms_opt(12, 40, 0).unwrap(),
            day.and_hms_opt(14, 10, 0).unwrap(),
        )
    }

    #[test]
    fn test_cache_id_format() {
        assert_eq!(
            CachedEntry::cache_id("ИКБО-60-23", &lecture()),
            "ИКБО-60-23_2025-09-01T12:40:00_Databases"
        );
    }

    #[test]
    fn test_entry_survives_caching() {
        let until = NaiveDate::from_ymd_opt(2025, 12, 30)
            .unwrap()
            .and_hms_opt(20, 59, 59)
            .unwrap();
        let entry = lecture()
            .with_room("A-9")
            .with_groups(vec!["ИКБО-60-23".to_string()])
            .with_recurrence(RecurrenceRule::weekly(2).with_until(until))
            .with_exceptions(vec![NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()]);

        let row = CachedEntry::from_entry("ИКБО-60-23", &entry, Utc::now());
        assert_eq!(row.frequency.as_deref(), Some("WEEKLY"));
        assert_eq!(row.lesson_type, "LK");
        assert_eq!(row.to_entry(), entry);
    }

    #[test]
    fn test_no_recurrence_columns_means_single_event() {
        let row = CachedEntry::from_entry("G", &lecture(), Utc::now());
        assert!(row.to_entry().recurrence.is_none());
    }

    #[test]
    fn test_interval_alone_restores_weekly_rule() {
        let mut row = CachedEntry::from_entry("G", &lecture(), Utc::now());
        row.interval = Some(2);
        let rule = row.to_entry().recurrence.unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, Some(2));
    }
}
