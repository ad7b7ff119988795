use fake::Dummy;
use serde::{Deserialize, Deserializer};

/// Defines a foreign-key reference as delivered by the remote service:
/// a two-element `[id, display_label]` array.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct RecordRef {
    pub id: i64,
    pub display: String,
}

impl<'de> Deserialize<'de> for RecordRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (id, display): (i64, String) = Deserialize::deserialize(deserializer)?;
        Ok(RecordRef { id, display })
    }
}

/// Deserialize an optional reference field. The service sends `false` for an
/// unset many-to-one, not `null`.
///
pub fn optional_ref<'de, D>(deserializer: D) -> Result<Option<RecordRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Ref(RecordRef),
        Absent(bool),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Ref(r) => Ok(Some(r)),
        Raw::Absent(_) => Ok(None),
    }
}

/// Deserialize a text field that may arrive as `false` when unset.
///
pub fn string_or_false<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Absent(bool),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => Ok(s),
        Raw::Absent(_) => Ok(String::new()),
    }
}

/// Deserialize an optional `YYYY-MM-DD` date field that may arrive as `false`.
///
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Absent(bool),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        Raw::Absent(_) => Ok(None),
    }
}

/// Defines report status values.
///
#[derive(Clone, Copy, Debug, Dummy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Completed,
    InProgress,
    NotStarted,
    Delayed,
    Plan,
    Overdue,
}

impl Status {
    /// All statuses in the order they cycle through the filter.
    ///
    pub const ALL: [Status; 6] = [
        Status::Completed,
        Status::InProgress,
        Status::NotStarted,
        Status::Delayed,
        Status::Plan,
        Status::Overdue,
    ];

    /// Wire and display key for this status.
    ///
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::InProgress => "in_progress",
            Status::NotStarted => "not_started",
            Status::Delayed => "delayed",
            Status::Plan => "plan",
            Status::Overdue => "overdue",
        }
    }
}

/// Defines a person-in-charge summary row: identity, position label, and the
/// seven status counters. `department_id`/`department_name` are attached by
/// the aggregator after load, never fetched.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct PersonSummary {
    #[serde(rename = "user_id")]
    pub user: RecordRef,
    #[serde(deserialize_with = "string_or_false", default)]
    pub position: String,
    pub total_tasks: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub not_started: u32,
    pub delayed: u32,
    pub plan: u32,
    pub overdue: u32,
    #[serde(skip)]
    pub department_id: Option<i64>,
    #[serde(skip)]
    pub department_name: String,
}

impl PersonSummary {
    /// Return the counter for the given status.
    ///
    pub fn status_count(&self, status: Status) -> u32 {
        match status {
            Status::Completed => self.completed,
            Status::InProgress => self.in_progress,
            Status::NotStarted => self.not_started,
            Status::Delayed => self.delayed,
            Status::Plan => self.plan,
            Status::Overdue => self.overdue,
        }
    }
}

/// Defines a department row. `total_users` and `total_tasks` are rollups
/// computed by the aggregator.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub total_users: u32,
    #[serde(skip)]
    pub total_tasks: u32,
}

/// Defines a person-to-department assignment. The raw feed may carry several
/// assignments per person; joins take the first match by user id.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct Assignment {
    #[serde(rename = "user_id")]
    pub user: RecordRef,
    #[serde(rename = "department_id")]
    pub department: RecordRef,
}

/// Defines a weekly report row. `notes` is raw HTML from the service;
/// `notes_text` and `dynamic` are derived during fetch.
///
#[derive(Clone, Debug, Dummy, PartialEq, Deserialize)]
pub struct ReportRecord {
    pub id: i64,
    #[serde(deserialize_with = "string_or_false", default)]
    pub name: String,
    #[serde(rename = "pic_id")]
    pub pic: RecordRef,
    #[serde(rename = "client_id", deserialize_with = "optional_ref", default)]
    pub client: Option<RecordRef>,
    #[serde(deserialize_with = "string_or_false", default)]
    pub project_task: String,
    #[serde(deserialize_with = "optional_date", default)]
    pub deadline: Option<chrono::NaiveDate>,
    pub status: Status,
    pub progress: f64,
    #[serde(deserialize_with = "string_or_false", default)]
    pub notes: String,
    #[serde(skip)]
    pub notes_text: String,
    #[serde(skip)]
    pub dynamic: Vec<(String, String)>,
}

impl ReportRecord {
    /// Progress clamped to 0..=100 for display. Input values are not
    /// validated by the service.
    ///
    pub fn display_progress(&self) -> f64 {
        self.progress.clamp(0.0, 100.0)
    }

    /// Display name of the client reference, or empty when unset.
    ///
    pub fn client_display(&self) -> &str {
        self.client.as_ref().map(|c| c.display.as_str()).unwrap_or("")
    }
}

/// Defines a per-department dynamic report column declared by a field
/// template, materialized as a synthetically named field on report records.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Deserialize)]
pub struct FieldTemplate {
    pub name: String,
    pub field_key: String,
}

/// Defines caller roles, classified by permission probes in priority order.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Board,
    Manager,
    Supervisor,
    Staff,
}

impl Role {
    /// Group identifiers probed during classification, highest priority
    /// first. Staff is the fallback when no probe matches.
    ///
    pub const PROBES: [(Role, &'static str); 3] = [
        (Role::Board, "picboard.group_board"),
        (Role::Manager, "picboard.group_manager"),
        (Role::Supervisor, "picboard.group_supervisor"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_ref_from_pair() {
        let value = json!([7, "Alice Chen"]);
        let r: RecordRef = serde_json::from_value(value).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.display, "Alice Chen");
    }

    #[test]
    fn person_summary_from_row() {
        let row = json!({
            "user_id": [3, "Bob Tan"],
            "position": "Developer",
            "total_tasks": 5,
            "completed": 2,
            "in_progress": 1,
            "not_started": 1,
            "delayed": 0,
            "plan": 1,
            "overdue": 0,
        });
        let p: PersonSummary = serde_json::from_value(row).unwrap();
        assert_eq!(p.user.display, "Bob Tan");
        assert_eq!(p.status_count(Status::Completed), 2);
        assert_eq!(p.department_name, "");
        assert_eq!(p.department_id, None);
    }

    #[test]
    fn person_summary_position_false() {
        let row = json!({
            "user_id": [3, "Bob Tan"],
            "position": false,
            "total_tasks": 0,
            "completed": 0,
            "in_progress": 0,
            "not_started": 0,
            "delayed": 0,
            "plan": 0,
            "overdue": 0,
        });
        let p: PersonSummary = serde_json::from_value(row).unwrap();
        assert_eq!(p.position, "");
    }

    #[test]
    fn report_record_from_row() {
        let row = json!({
            "id": 11,
            "name": "WR-0011",
            "pic_id": [3, "Bob Tan"],
            "client_id": false,
            "project_task": "Migration",
            "deadline": "2024-06-30",
            "status": "in_progress",
            "progress": 45.0,
            "notes": "<p>On track</p>",
        });
        let r: ReportRecord = serde_json::from_value(row).unwrap();
        assert_eq!(r.client, None);
        assert_eq!(r.client_display(), "");
        assert_eq!(r.status, Status::InProgress);
        assert_eq!(
            r.deadline,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
        );
    }

    #[test]
    fn progress_clamped_for_display_only() {
        let mut r: ReportRecord = serde_json::from_value(json!({
            "id": 1,
            "name": "WR-0001",
            "pic_id": [1, "A"],
            "project_task": "",
            "deadline": false,
            "status": "plan",
            "progress": 130.0,
            "notes": false,
        }))
        .unwrap();
        assert_eq!(r.progress, 130.0);
        assert_eq!(r.display_progress(), 100.0);
        r.progress = -5.0;
        assert_eq!(r.display_progress(), 0.0);
    }

    #[test]
    fn status_count_matches_named_fields() {
        use fake::{Fake, Faker};
        let person: PersonSummary = Faker.fake();
        assert_eq!(person.status_count(Status::Completed), person.completed);
        assert_eq!(person.status_count(Status::Overdue), person.overdue);
    }
}
