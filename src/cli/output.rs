use chrono::NaiveDate;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::app_data::AppData;
use crate::model::completion::date_key;
use crate::model::task::Task;
use crate::ops::analytics::Report;
use crate::ops::grid::HistoryRow;

/// Display width of the title column
pub const TITLE_WIDTH: usize = 24;
/// Display width of a task column in the history table
pub const HISTORY_COLUMN_WIDTH: usize = 10;
/// Width of the full-scale bar in the stats view
const BAR_WIDTH: usize = 20;

const DONE_MARK: &str = "✓";
const OPEN_MARK: &str = "·";

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub position: usize,
    pub id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct GridJson {
    pub days: Vec<String>,
    pub today: String,
    pub tasks: Vec<GridRowJson>,
}

#[derive(Serialize)]
pub struct GridRowJson {
    #[serde(flatten)]
    pub task: TaskJson,
    pub done: Vec<bool>,
}

#[derive(Serialize)]
pub struct HistoryJson {
    pub tasks: Vec<TaskJson>,
    pub rows: Vec<HistoryRow>,
}

/// Result of a rm/rename/mv: the task as it stands afterwards (or as it was,
/// for a deletion)
#[derive(Serialize)]
pub struct ChangeJson {
    pub changed: bool,
    #[serde(flatten)]
    pub task: TaskJson,
}

#[derive(Serialize)]
pub struct ClearJson {
    pub deleted: usize,
}

#[derive(Serialize)]
pub struct ToggleJson {
    pub id: String,
    pub date: String,
    pub done: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        position,
        id: task.id.clone(),
        title: task.title.clone(),
        created_at: task.created_at.to_rfc3339(),
    }
}

fn tasks_to_json(data: &AppData) -> Vec<TaskJson> {
    data.tasks
        .iter()
        .enumerate()
        .map(|(i, t)| task_to_json(i + 1, t))
        .collect()
}

pub fn grid_to_json(data: &AppData, days: &[NaiveDate], today: NaiveDate) -> GridJson {
    let keys: Vec<String> = days.iter().copied().map(date_key).collect();
    GridJson {
        tasks: data
            .tasks
            .iter()
            .enumerate()
            .map(|(i, t)| GridRowJson {
                task: task_to_json(i + 1, t),
                done: keys
                    .iter()
                    .map(|k| data.completions.is_completed(&t.id, k))
                    .collect(),
            })
            .collect(),
        days: keys,
        today: date_key(today),
    }
}

pub fn history_to_json(data: &AppData, rows: Vec<HistoryRow>) -> HistoryJson {
    HistoryJson {
        tasks: tasks_to_json(data),
        rows,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Pad or truncate `text` to exactly `width` display columns.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        let pad = width - text.width();
        return format!("{}{}", text, " ".repeat(pad));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // leave one column for the ellipsis
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn mark(done: bool) -> &'static str {
    if done { DONE_MARK } else { OPEN_MARK }
}

/// The tracker grid: one row per task, one column per day
pub fn format_grid(data: &AppData, days: &[NaiveDate], today: NaiveDate) -> Vec<String> {
    if data.tasks.is_empty() {
        return vec!["No tasks yet. Add one with `habit add <title>`.".to_string()];
    }

    let lead = format!("{:>3}  {}", "", fit_width("", TITLE_WIDTH));
    let mut weekdays = lead.clone();
    let mut numbers = format!("{:>3}  {}", "#", fit_width("Task", TITLE_WIDTH));
    for day in days {
        weekdays.push_str(&format!(" {:<3}", day.format("%a").to_string()));
        let num = day.format("%d").to_string();
        let num = if *day == today { format!("{}*", num) } else { num };
        numbers.push_str(&format!(" {:<3}", num));
    }

    let mut lines = vec![weekdays.trim_end().to_string(), numbers.trim_end().to_string()];
    for (i, task) in data.tasks.iter().enumerate() {
        let mut line = format!("{:>3}  {}", i + 1, fit_width(&task.title, TITLE_WIDTH));
        for day in days {
            let done = data.completions.is_completed(&task.id, &date_key(*day));
            line.push_str(&format!(" {:<3}", mark(done)));
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn bar(percentage: u32) -> String {
    let filled = (percentage.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// The analytics summary followed by one line per day
pub fn format_report(report: &Report) -> Vec<String> {
    let s = &report.summary;
    let mut lines = vec![
        format!(
            "Range             {} ({} → {})",
            report.range,
            date_key(report.window.start),
            date_key(report.window.end)
        ),
        format!("Consistency rate  {}%", s.rate),
        format!(
            "Checks completed  {} out of {} possible",
            s.total_checks, s.possible_checks
        ),
        format!("Active habits     {}", s.active_habits),
        String::new(),
    ];
    for day in &report.days {
        lines.push(format!(
            "{}  {:<6} {:>3}/{:<3} {:>3}%  {}{}",
            date_key(day.date),
            day.label,
            day.checks,
            day.total,
            day.percentage,
            bar(day.percentage),
            if day.complete { format!(" {}", DONE_MARK) } else { String::new() }
        ));
    }
    lines
}

/// The history table: one row per day, one column per task
pub fn format_history(data: &AppData, rows: &[HistoryRow]) -> Vec<String> {
    const DATE_WIDTH: usize = 20;
    let mut header = fit_width("Date", DATE_WIDTH);
    for task in &data.tasks {
        header.push_str(&format!(" {}", fit_width(&task.title, HISTORY_COLUMN_WIDTH)));
    }
    let mut lines = vec![header.trim_end().to_string()];
    for row in rows {
        let date = format!("{} ({})", row.date.format("%b %-d, %Y"), row.date.format("%a"));
        let mut line = fit_width(&date, DATE_WIDTH);
        for done in &row.done {
            let cell = if *done { DONE_MARK } else { "-" };
            line.push_str(&format!(" {}", fit_width(cell, HISTORY_COLUMN_WIDTH)));
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::range::TimeRange;
    use crate::ops::analytics::analyze;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> AppData {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut data = AppData {
            tasks: vec![
                Task::with_id("a".into(), "Walk".into(), at),
                Task::with_id("b".into(), "Read".into(), at),
            ],
            ..AppData::default()
        };
        data.completions.set("a", "2024-01-10", true);
        data.completions.set("b", "2024-01-09", true);
        data
    }

    #[test]
    fn fit_width_pads_short_text() {
        assert_eq!(fit_width("ab", 5), "ab   ");
        assert_eq!(fit_width("", 3), "   ");
    }

    #[test]
    fn fit_width_truncates_with_ellipsis() {
        assert_eq!(fit_width("abcdefgh", 5), "abcd…");
        assert_eq!(fit_width("abcdefgh", 5).width(), 5);
    }

    #[test]
    fn fit_width_counts_wide_chars() {
        // each CJK char is two columns
        let out = fit_width("日本語テキスト", 6);
        assert_eq!(out.width(), 6);
        assert!(out.starts_with("日本"));
        assert!(out.contains('…'));
    }

    #[test]
    fn grid_marks_today_and_checks() {
        let data = sample();
        let days = [day(2024, 1, 9), day(2024, 1, 10)];
        let lines = format_grid(&data, &days, day(2024, 1, 10));
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Tue"));
        assert!(lines[1].contains("10*"));
        assert!(lines[2].contains("Walk"));
        assert!(lines[2].ends_with(DONE_MARK));
        assert!(lines[3].contains("Read"));
        assert!(lines[3].ends_with(OPEN_MARK));
    }

    #[test]
    fn grid_without_tasks_shows_hint() {
        let lines = format_grid(&AppData::default(), &[day(2024, 1, 10)], day(2024, 1, 10));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("No tasks yet"));
    }

    #[test]
    fn grid_json_lines_up_with_days() {
        let data = sample();
        let days = [day(2024, 1, 9), day(2024, 1, 10)];
        let json = grid_to_json(&data, &days, day(2024, 1, 10));
        assert_eq!(json.days, vec!["2024-01-09", "2024-01-10"]);
        assert_eq!(json.tasks[0].done, vec![false, true]);
        assert_eq!(json.tasks[1].done, vec![true, false]);
        assert_eq!(json.tasks[1].task.position, 2);
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(100).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(100).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn report_lists_summary_then_days() {
        let data = sample();
        let report = analyze(&data.tasks, &data.completions, TimeRange::Week, day(2024, 1, 10));
        let lines = format_report(&report);
        assert!(lines[0].contains("7D"));
        assert!(lines[0].contains("2024-01-04"));
        assert_eq!(lines[1], "Consistency rate  14%");
        assert_eq!(lines[2], "Checks completed  2 out of 14 possible");
        assert_eq!(lines[3], "Active habits     2");
        assert_eq!(lines.len(), 5 + 7);
        assert!(lines[11].starts_with("2024-01-10  Wed"));
    }

    #[test]
    fn history_has_header_and_rows() {
        let data = sample();
        let rows = crate::ops::grid::history(&data, day(2024, 1, 10));
        let lines = format_history(&data, &rows);
        assert_eq!(lines.len(), 30);
        assert!(lines[0].contains("Walk"));
        assert!(lines[1].starts_with("Jan 9, 2024 (Tue)"));
        assert!(lines[1].contains(DONE_MARK));
    }
}
