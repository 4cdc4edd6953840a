//! iCalendar (RFC 5545) import of university timetable feeds.
//!
//! Only the subset the timetable feed emits is understood: `VEVENT` blocks
//! with `DTSTART`/`DTEND`, a weekly `RRULE`, `EXDATE` lists and a handful of
//! `X-META-*` extensions carrying discipline, teacher and group names.
//! Timezone parameters are ignored and all times are taken as local.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Frequency, LessonType, RecurrenceRule, ScheduleEntry};

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
const DATE_FORMAT: &str = "%Y%m%d";

struct Patterns {
    week_marker: Regex,
    teacher: Regex,
    group_code: Regex,
}

static PATTERNS: Lazy<Result<Patterns, regex::Error>> = Lazy::new(|| {
    Ok(Patterns {
        week_marker: Regex::new(r"^\d+\s*неделя$")?,
        teacher: Regex::new(r"Преподаватель:\s*([^\r\n]+)")?,
        group_code: Regex::new(r"[А-ЯЁ]{4}-\d{2}-\d{2}")?,
    })
});

/// A content line split into name, parameters and value.
#[derive(Debug, Clone)]
struct Property {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl Property {
    fn parse(line: &str) -> Option<Self> {
        let (head, value) = line.split_once(':')?;
        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }
        let params = parts
            .filter_map(|p| p.split_once('='))
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v.trim().to_string()))
            .collect();
        Some(Self {
            name,
            params,
            value: value.trim().to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct EventBlock {
    properties: Vec<Property>,
}

impl EventBlock {
    fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    fn text(&self, name: &str) -> Option<String> {
        self.value(name)
            .map(unescape_text)
            .filter(|s| !s.trim().is_empty())
    }

    fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Property> + 'a {
        self.properties.iter().filter(move |p| p.name == name)
    }
}

/// Join folded lines back into logical content lines.
///
/// A line starting with a space or tab continues the previous one. Lines
/// without a colon are treated as continuations as well; some feeds wrap
/// long descriptions without folding them.
fn unfold_lines(data: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in data.lines() {
        let raw = raw.trim_end_matches('\r');
        if raw.is_empty() {
            continue;
        }
        let folded = raw.starts_with(' ') || raw.starts_with('\t');
        if folded || !raw.contains(':') {
            if let Some(last) = lines.last_mut() {
                last.push_str(if folded { &raw[1..] } else { raw });
                continue;
            }
        }
        lines.push(raw.to_string());
    }
    lines
}

fn split_events(lines: &[String]) -> Vec<EventBlock> {
    let mut events = Vec::new();
    let mut current: Option<EventBlock> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(EventBlock::default());
        } else if trimmed.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(event) = current.take() {
                events.push(event);
            }
        } else if let Some(event) = current.as_mut() {
            if let Some(property) = Property::parse(trimmed) {
                event.properties.push(property);
            }
        }
    }
    events
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a DATE or DATE-TIME value; a trailing `Z` is ignored and a bare date
/// maps to midnight (or `date_only_time` when given).
fn parse_ical_datetime(value: &str, date_only_time: NaiveTime) -> Option<NaiveDateTime> {
    let value = value.trim().trim_end_matches('Z');
    if value.contains('T') {
        NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).ok()
    } else {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .map(|d| d.and_time(date_only_time))
    }
}

fn is_all_day(property: &Property) -> bool {
    property.param("VALUE") == Some("DATE") || !property.value.contains('T')
}

fn parse_rrule(value: &str) -> Option<RecurrenceRule> {
    let mut frequency = None;
    let mut interval = None;
    let mut until = None;

    for part in value.split(';') {
        let Some((key, val)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Some(Frequency::from(val.trim().to_string())),
            "INTERVAL" => match val.trim().parse::<i32>() {
                Ok(n) => interval = Some(n),
                Err(_) => warn!("Ignoring unparsable RRULE INTERVAL '{}'", val),
            },
            "UNTIL" => {
                let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
                until = parse_ical_datetime(val, end_of_day);
                if until.is_none() {
                    warn!("Ignoring unparsable RRULE UNTIL '{}'", val);
                }
            }
            _ => {}
        }
    }

    frequency.map(|frequency| RecurrenceRule {
        frequency,
        interval,
        until,
    })
}

fn lesson_type_of(categories: &str, summary: &str) -> LessonType {
    for (tag, lesson_type) in [
        ("ЛК", LessonType::Lecture),
        ("ПР", LessonType::Practice),
        ("ЛАБ", LessonType::Laboratory),
    ] {
        if categories.contains(tag) || summary.starts_with(tag) {
            return lesson_type;
        }
    }
    LessonType::Lecture
}

fn discipline_of(event: &EventBlock) -> Option<String> {
    if let Some(meta) = event.text("X-META-DISCIPLINE") {
        return Some(clean_text(&meta));
    }
    let summary = event.text("SUMMARY")?;
    let stripped = ["ЛК ", "ПР ", "ЛАБ "]
        .iter()
        .find_map(|prefix| summary.strip_prefix(prefix))
        .unwrap_or(&summary);
    Some(clean_text(stripped)).filter(|s| !s.is_empty())
}

fn teacher_of(event: &EventBlock, patterns: &Patterns) -> String {
    if let Some(description) = event.text("DESCRIPTION") {
        if let Some(caps) = patterns.teacher.captures(&description) {
            return clean_text(&caps[1]);
        }
    }
    event
        .text("X-META-TEACHER")
        .map(|t| clean_text(&t))
        .unwrap_or_default()
}

fn groups_of(event: &EventBlock, patterns: &Patterns) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    let mut push = |group: &str| {
        if !groups.iter().any(|g| g == group) {
            groups.push(group.to_string());
        }
    };

    if let Some(description) = event.text("DESCRIPTION") {
        if description.contains("Группы:") {
            for m in patterns.group_code.find_iter(&description) {
                push(m.as_str());
            }
        }
    }
    for property in &event.properties {
        if property.name.starts_with("X-META-GROUP") {
            if let Some(m) = patterns.group_code.find(&property.value) {
                push(m.as_str());
            }
        }
    }
    groups
}

fn exceptions_of(event: &EventBlock) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = event
        .all("EXDATE")
        .flat_map(|p| p.value.split(','))
        .filter_map(|v| {
            let parsed = parse_ical_datetime(v, NaiveTime::MIN).map(|dt| dt.date());
            if parsed.is_none() {
                warn!("Ignoring unparsable EXDATE '{}'", v);
            }
            parsed
        })
        .collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Outcome of looking at one event block.
enum EventOutcome {
    Lesson(Box<ScheduleEntry>),
    Skipped(&'static str),
}

fn convert_event(event: &EventBlock, patterns: &Patterns) -> EventOutcome {
    let summary = event.text("SUMMARY").unwrap_or_default();
    if patterns.week_marker.is_match(summary.trim()) {
        return EventOutcome::Skipped("week marker");
    }

    let Some(dtstart) = event.get("DTSTART") else {
        return EventOutcome::Skipped("missing DTSTART");
    };
    if is_all_day(dtstart) {
        return EventOutcome::Skipped("all-day event");
    }

    let start = parse_ical_datetime(&dtstart.value, NaiveTime::MIN);
    let end = event
        .value("DTEND")
        .and_then(|v| parse_ical_datetime(v, NaiveTime::MIN));
    let (Some(start), Some(end)) = (start, end) else {
        return EventOutcome::Skipped("missing or unparsable start/end");
    };
    let Some(discipline) = discipline_of(event) else {
        return EventOutcome::Skipped("missing discipline");
    };

    let categories = event.text("CATEGORIES").unwrap_or_default();
    let mut entry = ScheduleEntry::new(
        discipline,
        lesson_type_of(&categories, &summary),
        start,
        end,
    )
    .with_room(event.text("LOCATION").unwrap_or_default())
    .with_teacher(teacher_of(event, patterns))
    .with_groups(groups_of(event, patterns))
    .with_exceptions(exceptions_of(event));

    if let Some(rule) = event.value("RRULE").and_then(parse_rrule) {
        entry = entry.with_recurrence(rule);
    }
    entry.id = event.value("UID").map(str::to_string);
    entry.description = event.text("DESCRIPTION");

    EventOutcome::Lesson(Box::new(entry))
}

/// Convert an iCalendar document into schedule entries.
///
/// Week-marker events ("5 неделя"), all-day events and events lacking a
/// start, end or discipline are skipped. Events whose end precedes their
/// start are skipped with a warning. Identical lessons appearing more than
/// once are kept only once, in first-seen order.
pub fn parse_icalendar(data: &str) -> Result<Vec<ScheduleEntry>> {
    let patterns = PATTERNS
        .as_ref()
        .map_err(|e| anyhow!("Failed to compile iCalendar patterns: {}", e))?;

    if data.trim().is_empty() {
        warn!("Empty iCalendar document");
        return Ok(Vec::new());
    }

    let events = split_events(&unfold_lines(data));
    if events.is_empty() {
        warn!("iCalendar document contains no VEVENT blocks");
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for (index, event) in events.iter().enumerate() {
        let entry = match convert_event(event, patterns) {
            EventOutcome::Lesson(entry) => *entry,
            EventOutcome::Skipped(reason) => {
                debug!("Skipping event {}: {}", index, reason);
                skipped += 1;
                continue;
            }
        };

        if let Err(e) = entry.validate() {
            warn!("Skipping invalid event {} ({}): {}", index, entry.discipline, e);
            skipped += 1;
            continue;
        }

        let key = (
            entry.discipline.clone(),
            entry.lesson_type.clone(),
            entry.start,
            entry.end,
            entry.room.clone(),
        );
        if seen.insert(key) {
            entries.push(entry);
        } else {
            debug!("Dropping duplicate event {} ({})", index, entry.discipline);
        }
    }

    info!(
        "Parsed iCalendar: {} events, {} lessons, {} skipped",
        events.len(),
        entries.len(),
        skipped
    );
    Ok(entries)
}

/// Read and parse an `.ics` file.
pub fn parse_icalendar_file(path: &Path) -> Result<Vec<ScheduleEntry>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read iCalendar file: {}", path.display()))?;
    parse_icalendar(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
#[path = "ical_parser_tests.rs"]
mod ical_parser_tests;
