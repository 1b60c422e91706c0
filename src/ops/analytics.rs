//! Consistency analytics over a date window.
//!
//! Everything here is a pure function of the task list, the completion map,
//! the selected range and the current day. Nothing is cached between calls.
//!
//! The current task list is applied to every day in the window: a task
//! created yesterday still counts as "possible" for last week. Task history
//! is not tracked, so this is the only consistent definition available.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::completion::{CompletionMap, date_key};
use crate::model::range::TimeRange;
use crate::model::task::Task;

/// Inclusive span of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Every day from `start` through `end`, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// One bar of the per-day series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStat {
    pub date: NaiveDate,
    /// Axis label; its format depends on the range
    pub label: String,
    /// Tasks completed on this day
    pub checks: usize,
    /// Tasks that could have been completed (the current task count)
    pub total: usize,
    /// `checks / total` as a rounded percentage, 0 when there are no tasks
    pub percentage: u32,
    /// Every task was completed
    pub complete: bool,
}

/// Totals over the whole window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_checks: usize,
    pub possible_checks: usize,
    /// Consistency rate in percent
    pub rate: u32,
    pub active_habits: usize,
}

/// Full analytics result for one range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub range: TimeRange,
    pub window: DateWindow,
    pub days: Vec<DayStat>,
    pub summary: Summary,
}

/// Work out which days a range covers, ending today.
///
/// `ALL` starts at the earliest completed day on record, or covers the same
/// 30 days as `30D` when nothing has been completed yet. A start later than
/// today is clamped so the window is never inverted.
pub fn resolve_window(range: TimeRange, completions: &CompletionMap, today: NaiveDate) -> DateWindow {
    let start = match range.fixed_days() {
        Some(n) => days_before(today, n - 1),
        None => completions
            .earliest_completed()
            .unwrap_or_else(|| days_before(today, 29)),
    };
    DateWindow {
        start: start.min(today),
        end: today,
    }
}

/// Compute the per-day series and the summary for `range`.
pub fn analyze(
    tasks: &[Task],
    completions: &CompletionMap,
    range: TimeRange,
    today: NaiveDate,
) -> Report {
    let window = resolve_window(range, completions, today);
    let total = tasks.len();

    let days: Vec<DayStat> = window
        .days()
        .map(|date| {
            let key = date_key(date);
            let checks = tasks
                .iter()
                .filter(|t| completions.is_completed(&t.id, &key))
                .count();
            DayStat {
                date,
                label: day_label(range, date),
                checks,
                total,
                percentage: round_percent(checks, total),
                complete: total > 0 && checks >= total,
            }
        })
        .collect();

    let total_checks = days.iter().map(|d| d.checks).sum();
    let possible_checks = total * days.len();

    Report {
        range,
        window,
        summary: Summary {
            total_checks,
            possible_checks,
            rate: round_percent(total_checks, possible_checks),
            active_habits: total,
        },
        days,
    }
}

/// `part / whole` as a percentage rounded half-up. Zero when `whole` is zero.
pub fn round_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u64, whole as u64);
    ((200 * part + whole) / (2 * whole)) as u32
}

fn day_label(range: TimeRange, date: NaiveDate) -> String {
    match range {
        // single-day chart is labelled by time of day; the bucket starts at midnight
        TimeRange::Day => "00:00".to_string(),
        TimeRange::Week => date.format("%a").to_string(),
        TimeRange::Month | TimeRange::All => date.format("%b %d").to_string(),
    }
}

fn days_before(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}
