//! Day layouts for the tracker grid and the history table.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::model::app_data::AppData;
use crate::model::completion::date_key;

/// Grid columns before today
pub const GRID_DAYS_BEFORE: u64 = 1;
/// Grid columns after today
pub const GRID_DAYS_AFTER: u64 = 10;
/// Oldest history row, in days before today
pub const HISTORY_DAYS: u64 = 29;

/// Columns of the tracker grid: yesterday through ten days ahead.
pub fn tracker_days(today: NaiveDate) -> Vec<NaiveDate> {
    let start = today
        .checked_sub_days(Days::new(GRID_DAYS_BEFORE))
        .unwrap_or(today);
    let end = today
        .checked_add_days(Days::new(GRID_DAYS_AFTER))
        .unwrap_or(today);
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// One day of history: a completed flag per task, in task order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub done: Vec<bool>,
}

/// Completed days from `HISTORY_DAYS` ago up to yesterday, newest first.
/// Today is left out; it lives on the tracker grid.
pub fn history(data: &AppData, today: NaiveDate) -> Vec<HistoryRow> {
    (1..=HISTORY_DAYS)
        .filter_map(|n| today.checked_sub_days(Days::new(n)))
        .map(|date| {
            let key = date_key(date);
            HistoryRow {
                date,
                done: data
                    .tasks
                    .iter()
                    .map(|t| data.completions.is_completed(&t.id, &key))
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tracker_days_span_yesterday_to_ten_ahead() {
        let days = tracker_days(day(2024, 1, 10));
        assert_eq!(days.len(), 12);
        assert_eq!(days[0], day(2024, 1, 9));
        assert_eq!(days[1], day(2024, 1, 10));
        assert_eq!(*days.last().unwrap(), day(2024, 1, 20));
    }

    #[test]
    fn history_is_newest_first_and_excludes_today() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut data = AppData {
            tasks: vec![
                Task::with_id("a".into(), "A".into(), at),
                Task::with_id("b".into(), "B".into(), at),
            ],
            ..AppData::default()
        };
        data.completions.set("a", "2024-01-09", true);
        data.completions.set("b", "2024-01-10", true);
        data.completions.set("b", "2023-12-12", true);

        let rows = history(&data, day(2024, 1, 10));
        assert_eq!(rows.len(), 29);
        assert_eq!(rows[0].date, day(2024, 1, 9));
        assert_eq!(rows[0].done, vec![true, false]);
        assert_eq!(rows[28].date, day(2023, 12, 12));
        assert_eq!(rows[28].done, vec![false, true]);
        assert!(rows.iter().all(|r| r.date < day(2024, 1, 10)));
    }

    #[test]
    fn history_rows_are_empty_without_tasks() {
        let rows = history(&AppData::default(), day(2024, 1, 10));
        assert_eq!(rows.len(), 29);
        assert!(rows.iter().all(|r| r.done.is_empty()));
    }
}
