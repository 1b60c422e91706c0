use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A recurring habit tracked once per calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier, assigned at creation and never changed
    pub id: String,
    /// Display label
    pub title: String,
    /// Creation instant, stored as ISO-8601
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a task with a fresh random ID, stamped with the current time.
    ///
    /// The title is stored as given; callers normalize it first with
    /// [`normalize_title`].
    pub fn new(title: String) -> Self {
        Task::with_id(Uuid::new_v4().to_string(), title, Utc::now())
    }

    /// Build a task from already-known parts (loading, fixtures).
    pub fn with_id(id: String, title: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id,
            title,
            created_at,
        }
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC,
/// a bare date as its midnight.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// Trim a user-entered title. Returns `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_tasks_get_distinct_ids() {
        let a = Task::new("Read".into());
        let b = Task::new("Read".into());
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, b.title);
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  Stretch \n"), Some("Stretch".into()));
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("   \t"), None);
    }

    #[test]
    fn serializes_with_camel_case_created_at() {
        let task = Task::with_id(
            "t1".into(),
            "Walk".into(),
            Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap(),
        );
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["title"], "Walk");
        assert!(value["createdAt"].as_str().unwrap().starts_with("2024-01-10T08:30:00"));
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn timestamps_without_offset_are_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-10T08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-10 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-10T08:30"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-10T10:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-01-10"),
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn rejects_unparseable_created_at() {
        let json = r#"{"id":"x","title":"Walk","createdAt":"soon"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn parses_browser_style_timestamp() {
        let json = r#"{"id":"x","title":"Walk","createdAt":"2024-01-10T08:30:00.123Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.created_at.timestamp_subsec_millis(), 123);
    }
}
