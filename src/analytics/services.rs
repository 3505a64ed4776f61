//! Aggregations over one user's task set.
//!
//! Week buckets follow the Sunday-first `%U` convention: the days of a year
//! before its first Sunday form week `00`, each Sunday starts a new week, and
//! the year is the calendar year of the date. This is not ISO-8601 week
//! numbering, so `2025-12-31` lands in `2025-W52` rather than ISO week 1 of 2026.

use std::collections::BTreeMap;

use time::Date;

use super::dto::{Breakdown, Summary, WeekTrend};
use crate::{tasks::repo_types::Task, timestamp};

/// Number of most recent week buckets returned by [`trends`].
pub const TREND_WEEKS: usize = 8;

pub fn summary(tasks: &[Task]) -> Summary {
    let mut by_category = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    let mut completed = 0u64;

    for task in tasks {
        let done = task.is_completed();
        if done {
            completed += 1;
        }
        by_category
            .entry(task.category)
            .or_insert_with(Breakdown::default)
            .record(done);
        by_priority
            .entry(task.priority)
            .or_insert_with(Breakdown::default)
            .record(done);
    }

    let total = tasks.len() as u64;
    Summary {
        total_tasks: total,
        completed_tasks: completed,
        pending_tasks: total - completed,
        completion_rate: completion_rate(completed, total),
        by_category,
        by_priority,
    }
}

/// Percentage rounded to one decimal; zero for an empty set.
fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = completed as f64 / total as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

/// `%U` week number: 0 until the year's first Sunday.
fn sunday_week(date: Date) -> u16 {
    let yday = date.ordinal() - 1;
    let wday = date.weekday().number_days_from_sunday() as u16;
    (yday + 7 - wday) / 7
}

/// Bucket key such as `2026-W07`, or `None` when the timestamp does not parse.
pub fn week_key(created_at: &str) -> Option<String> {
    let date = timestamp::parse(created_at)?.date();
    Some(format!("{}-W{:02}", date.year(), sunday_week(date)))
}

pub fn trends(tasks: &[Task]) -> Vec<WeekTrend> {
    let mut weeks: BTreeMap<String, WeekTrend> = BTreeMap::new();

    for task in tasks {
        // unparsable timestamps drop out of the trend instead of failing it
        let Some(key) = week_key(&task.created_at) else {
            continue;
        };
        let entry = weeks.entry(key.clone()).or_insert_with(|| WeekTrend {
            week: key,
            created: 0,
            completed: 0,
        });
        entry.created += 1;
        if task.is_completed() {
            entry.completed += 1;
        }
    }

    let skip = weeks.len().saturating_sub(TREND_WEEKS);
    weeks.into_values().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::tasks::repo_types::{Category, Priority, Status};

    fn task(status: Status, category: Category, priority: Priority, created_at: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "t".into(),
            description: String::new(),
            due_date: "2026-12-01".into(),
            priority,
            category,
            status,
            created_at: created_at.into(),
            updated_at: created_at.into(),
        }
    }

    fn simple(status: Status, category: Category) -> Task {
        task(status, category, Priority::Medium, "2026-10-18T10:00:00.000000Z")
    }

    #[test]
    fn summary_of_nothing() {
        let s = summary(&[]);
        assert_eq!(s.total_tasks, 0);
        assert_eq!(s.completed_tasks, 0);
        assert_eq!(s.pending_tasks, 0);
        assert_eq!(s.completion_rate, 0.0);
        assert!(s.by_category.is_empty());
        assert!(s.by_priority.is_empty());
    }

    #[test]
    fn summary_counts_and_rounds() {
        let tasks = vec![
            simple(Status::Completed, Category::Work),
            simple(Status::Pending, Category::Work),
            simple(Status::Completed, Category::Personal),
        ];
        let s = summary(&tasks);

        assert_eq!(s.total_tasks, 3);
        assert_eq!(s.completed_tasks, 2);
        assert_eq!(s.pending_tasks, 1);
        assert_eq!(s.completion_rate, 66.7);
        assert_eq!(s.by_category.len(), 2);
        assert_eq!(
            s.by_category[&Category::Work],
            Breakdown { total: 2, completed: 1 }
        );
        assert_eq!(
            s.by_category[&Category::Personal],
            Breakdown { total: 1, completed: 1 }
        );
        assert!(!s.by_category.contains_key(&Category::Health));
        assert_eq!(
            s.by_priority[&Priority::Medium],
            Breakdown { total: 3, completed: 2 }
        );
    }

    #[test]
    fn summary_serializes_with_wire_names() {
        let s = summary(&[simple(Status::Completed, Category::Study)]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["total_tasks"], 1);
        assert_eq!(json["completion_rate"], 100.0);
        assert_eq!(json["by_category"]["Study"]["completed"], 1);
        assert_eq!(json["by_priority"]["Medium"]["total"], 1);
    }

    #[test]
    fn completion_rate_rounding() {
        assert_eq!(completion_rate(1, 3), 33.3);
        assert_eq!(completion_rate(1, 8), 12.5);
        assert_eq!(completion_rate(5, 5), 100.0);
    }

    #[test]
    fn week_keys_are_sunday_based() {
        assert_eq!(week_key("2026-01-01T12:00:00Z").as_deref(), Some("2026-W00"));
        assert_eq!(week_key("2026-01-03T12:00:00Z").as_deref(), Some("2026-W00"));
        assert_eq!(week_key("2026-01-04T00:00:00Z").as_deref(), Some("2026-W01"));
        assert_eq!(week_key("2026-02-14T12:00:00Z").as_deref(), Some("2026-W06"));
        assert_eq!(week_key("2026-02-15T12:00:00Z").as_deref(), Some("2026-W07"));
        assert_eq!(week_key("2026-10-18T09:30:00.123456Z").as_deref(), Some("2026-W42"));
        assert_eq!(week_key("2023-01-01T08:00:00Z").as_deref(), Some("2023-W01"));
        // ISO would call this 2026-W01
        assert_eq!(week_key("2025-12-31T12:00:00Z").as_deref(), Some("2025-W52"));
    }

    #[test]
    fn week_key_uses_the_recorded_offset() {
        assert_eq!(week_key("2026-01-03T23:30:00-02:00").as_deref(), Some("2026-W00"));
    }

    #[test]
    fn week_key_rejects_garbage() {
        assert_eq!(week_key("not a date"), None);
        assert_eq!(week_key("2026-13-40"), None);
    }

    #[test]
    fn trends_group_sort_and_skip_unparsable() {
        let tasks = vec![
            task(Status::Completed, Category::Work, Priority::Low, "2026-02-15T08:00:00Z"),
            task(Status::Pending, Category::Work, Priority::Low, "2026-01-05T08:00:00Z"),
            task(Status::Pending, Category::Work, Priority::Low, "2026-02-16T08:00:00Z"),
            task(Status::Completed, Category::Work, Priority::Low, "garbage"),
        ];
        let t = trends(&tasks);
        assert_eq!(
            t,
            vec![
                WeekTrend { week: "2026-W01".into(), created: 1, completed: 0 },
                WeekTrend { week: "2026-W07".into(), created: 2, completed: 1 },
            ]
        );
    }

    #[test]
    fn trends_keep_the_latest_eight_weeks() {
        let start = time::macros::date!(2026 - 01 - 04);
        let tasks: Vec<Task> = (0..10)
            .map(|k| {
                let day = start + time::Duration::weeks(k);
                let stamp = format!("{day}T12:00:00Z");
                task(Status::Pending, Category::Work, Priority::Low, &stamp)
            })
            .collect();

        let t = trends(&tasks);
        assert_eq!(t.len(), TREND_WEEKS);
        assert_eq!(t.first().unwrap().week, "2026-W03");
        assert_eq!(t.last().unwrap().week, "2026-W10");
        assert!(t.windows(2).all(|w| w[0].week < w[1].week));
    }

    #[test]
    fn trends_of_nothing() {
        assert!(trends(&[]).is_empty());
    }
}
