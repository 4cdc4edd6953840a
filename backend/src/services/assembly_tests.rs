use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use super::*;
use crate::models::{DayItem, LessonType, RecurrenceRule, ScheduleEntry, Timetable};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    date().and_hms_opt(h, m, 0).unwrap()
}

fn entry(name: &str, start: (u32, u32), end: (u32, u32)) -> ScheduleEntry {
    ScheduleEntry::new(name, LessonType::Lecture, at(start.0, start.1), at(end.0, end.1))
}

fn slot_of(item: &DayItem) -> Option<u8> {
    match item {
        DayItem::Lesson { slot, .. } => *slot,
        DayItem::Break(_) => None,
    }
}

#[test]
fn test_dense_single_lesson_in_slot_five() {
    let grid = Timetable::default();
    let lesson = entry("Databases", (16, 20), (17, 50));
    let day = assemble_dense(&grid, date(), &[&lesson], UnmatchedPolicy::Drop).unwrap();

    assert_eq!(day.items.len(), 13);
    let lessons: Vec<&ScheduleEntry> = day.lessons().collect();
    assert_eq!(lessons.len(), 7);
    for (index, item) in lessons.iter().enumerate() {
        if index == 4 {
            assert_eq!(item.discipline, "Databases");
        } else {
            assert!(item.is_empty_placeholder(), "slot {} should be empty", index + 1);
        }
    }
    let breaks: Vec<_> = day.breaks().copied().collect();
    assert_eq!(breaks, grid.breaks().to_vec());
}

#[test]
fn test_dense_alternates_lessons_and_breaks() {
    let grid = Timetable::default();
    let day = assemble_dense(&grid, date(), &[], UnmatchedPolicy::Drop).unwrap();
    for (index, item) in day.items.iter().enumerate() {
        assert_eq!(item.is_lesson(), index % 2 == 0);
    }
    let slots: Vec<u8> = day.items.iter().filter_map(slot_of).collect();
    assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(!day.has_lessons());
}

#[test]
fn test_dense_placeholders_use_grid_times() {
    let grid = Timetable::default();
    let day = assemble_dense(&grid, date(), &[], UnmatchedPolicy::Drop).unwrap();
    let first = day.lessons().next().unwrap();
    assert_eq!(first.start, at(9, 0));
    assert_eq!(first.end, at(10, 30));
    assert_eq!(first.lesson_type, LessonType::Empty);
}

#[test]
fn test_dense_drops_off_grid_entry() {
    let grid = Timetable::default();
    let off_grid = entry("Elective", (16, 0), (17, 30));
    let day = assemble_dense(&grid, date(), &[&off_grid], UnmatchedPolicy::Drop).unwrap();
    assert!(day.lessons().all(ScheduleEntry::is_empty_placeholder));
    assert!(day.unscheduled.is_empty());
}

#[test]
fn test_dense_rejects_off_grid_entry() {
    let grid = Timetable::default();
    let off_grid = entry("Elective", (16, 0), (17, 30));
    let err = assemble_dense(&grid, date(), &[&off_grid], UnmatchedPolicy::Reject).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("16:00"));
}

#[test]
fn test_dense_collects_unscheduled_entry() {
    let grid = Timetable::default();
    let off_grid = entry("Elective", (16, 0), (17, 30));
    let day = assemble_dense(&grid, date(), &[&off_grid], UnmatchedPolicy::Unscheduled).unwrap();
    assert_eq!(day.items.len(), 13);
    assert_eq!(day.unscheduled.len(), 1);
    assert!(day.has_lessons());
}

#[test]
fn test_dense_slot_collision_keeps_later_entry() {
    let grid = Timetable::default();
    let first = entry("Physics", (9, 0), (10, 30));
    let second = entry("Chemistry", (9, 0), (10, 30));
    let day = assemble_dense(&grid, date(), &[&first, &second], UnmatchedPolicy::Drop).unwrap();
    assert_eq!(day.lessons().next().unwrap().discipline, "Chemistry");
}

#[test]
fn test_dense_orders_by_slot_not_input() {
    let grid = Timetable::default();
    let late = entry("Late", (19, 40), (21, 10));
    let early = entry("Early", (10, 40), (12, 10));
    let day = assemble_dense(&grid, date(), &[&late, &early], UnmatchedPolicy::Drop).unwrap();
    let names: Vec<&str> = day
        .lessons()
        .filter(|e| !e.is_empty_placeholder())
        .map(|e| e.discipline.as_str())
        .collect();
    assert_eq!(names, vec!["Early", "Late"]);
}

#[test]
fn test_end_before_start_is_rejected() {
    let grid = Timetable::default();
    let broken = entry("Broken", (10, 40), (9, 0));
    assert!(assemble_dense(&grid, date(), &[&broken], UnmatchedPolicy::Drop)
        .unwrap_err()
        .is_validation());
    assert!(assemble_sparse(&grid, date(), &[&broken]).unwrap_err().is_validation());
}

#[test]
fn test_sparse_inserts_exact_breaks_only() {
    let grid = Timetable::default();
    let first = entry("Networks", (9, 0), (10, 30));
    let second = entry("Databases", (10, 40), (12, 10));
    let fourth = entry("Physics", (14, 20), (15, 50));
    let day = assemble_sparse(&grid, date(), &[&fourth, &first, &second]).unwrap();

    assert_eq!(day.items.len(), 4);
    assert!(day.items[0].is_lesson());
    assert!(matches!(day.items[1], DayItem::Break(b) if b.number == 1));
    assert!(day.items[2].is_lesson());
    // 12:10 -> 14:20 is not a canonical break, so lessons stay adjacent.
    assert!(day.items[3].is_lesson());
    assert_eq!(slot_of(&day.items[3]), Some(4));
}

#[test]
fn test_sparse_skips_placeholders_and_keeps_off_grid() {
    let grid = Timetable::default();
    let slot = grid.lesson_slot(1).copied().unwrap();
    let placeholder = ScheduleEntry::empty_placeholder(&slot, date());
    let off_grid = entry("Elective", (16, 0), (17, 30));
    let day = assemble_sparse(&grid, date(), &[&placeholder, &off_grid]).unwrap();
    assert_eq!(day.items.len(), 1);
    assert_eq!(slot_of(&day.items[0]), None);
}

#[test]
fn test_sparse_empty_day() {
    let grid = Timetable::default();
    let day = assemble_sparse(&grid, date(), &[]).unwrap();
    assert!(day.is_empty());
    assert!(!day.has_lessons());
}

#[test]
fn test_assemble_day_filters_then_assembles() {
    let grid = Timetable::default();
    let recurring = ScheduleEntry::new(
        "Databases",
        LessonType::Lecture,
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap().and_hms_opt(12, 40, 0).unwrap(),
        NaiveDate::from_ymd_opt(2025, 9, 3).unwrap().and_hms_opt(14, 10, 0).unwrap(),
    )
    .with_recurrence(RecurrenceRule::weekly(2));
    let entries = vec![recurring];

    let hit = NaiveDate::from_ymd_opt(2025, 9, 17).unwrap();
    let miss = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();

    let day = assemble_day(&entries, hit, &grid, AssemblyOptions::sparse()).unwrap();
    assert_eq!(day.items.len(), 1);
    assert_eq!(day.date, hit);

    let day = assemble_day(&entries, miss, &grid, AssemblyOptions::sparse()).unwrap();
    assert!(day.is_empty());

    let day = assemble_day(&entries, hit, &grid, AssemblyOptions::dense()).unwrap();
    assert_eq!(day.lessons().nth(2).unwrap().discipline, "Databases");
}

#[test]
fn test_assemble_day_resolves_zero_interval_as_weekly() {
    let grid = Timetable::default();
    let monday = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
    let lesson = ScheduleEntry::new(
        "Databases",
        LessonType::Practice,
        monday.and_hms_opt(16, 20, 0).unwrap(),
        monday.and_hms_opt(17, 50, 0).unwrap(),
    )
    .with_recurrence(RecurrenceRule::weekly(0));
    let entries = vec![lesson];

    let day = assemble_day(&entries, monday, &grid, AssemblyOptions::dense()).unwrap();
    assert_eq!(day.lessons().nth(4).unwrap().discipline, "Databases");

    let next_week = monday + chrono::Duration::weeks(1);
    let day = assemble_day(&entries, next_week, &grid, AssemblyOptions::sparse()).unwrap();
    assert_eq!(day.items.len(), 1);
}

#[test]
fn test_mode_from_show_empty_preference() {
    assert_eq!(AssemblyMode::from_show_empty_lessons(true), AssemblyMode::Dense);
    assert_eq!(AssemblyMode::from_show_empty_lessons(false), AssemblyMode::Sparse);
}

fn arb_entry() -> impl Strategy<Value = ScheduleEntry> {
    (8u32..21, prop::sample::select(vec![0u32, 20, 40]), 30i64..120).prop_map(|(h, m, len)| {
        let start = at(h, m);
        ScheduleEntry::new("Generated", LessonType::Practice, start, start + chrono::Duration::minutes(len))
    })
}

proptest! {
    #[test]
    fn prop_dense_always_has_full_grid(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let grid = Timetable::default();
        let refs: Vec<&ScheduleEntry> = entries.iter().collect();
        let day = assemble_dense(&grid, date(), &refs, UnmatchedPolicy::Drop).unwrap();
        prop_assert_eq!(day.lessons().count(), 7);
        prop_assert_eq!(day.breaks().count(), 6);
        let slots: Vec<u8> = day.items.iter().filter_map(slot_of).collect();
        prop_assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn prop_sparse_breaks_present_when_grid_has_one(entries in prop::collection::vec(arb_entry(), 0..12)) {
        let grid = Timetable::default();
        let refs: Vec<&ScheduleEntry> = entries.iter().collect();
        let day = assemble_sparse(&grid, date(), &refs).unwrap();
        for pair in day.items.windows(2) {
            if let (Some(prev), Some(next)) = (pair[0].as_entry(), pair[1].as_entry()) {
                prop_assert!(grid.break_between(prev.end_time(), next.start_time()).is_none());
                prop_assert!(prev.start_time() <= next.start_time());
            }
        }
    }
}
