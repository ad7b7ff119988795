mod client;
mod error;
mod records;

pub use client::SearchOptions;
pub use error::BackendError;
pub use records::*;

use crate::utils::notes::strip_html;
use anyhow::Result;
use client::Client;
use log::*;
use serde_json::{json, Value};

/// Entity names exposed by the remote service.
pub const ENTITY_PIC_OVERVIEW: &str = "pic.overview";
pub const ENTITY_DEPARTMENT: &str = "hr.department";
pub const ENTITY_ASSIGNMENT: &str = "user.assignment";
pub const ENTITY_WEEKLY_REPORT: &str = "weekly.report";
pub const ENTITY_FIELD_TEMPLATE: &str = "report.field.template";

const REPORT_BASE_FIELDS: [&str; 9] = [
    "id",
    "name",
    "pic_id",
    "client_id",
    "project_task",
    "deadline",
    "status",
    "progress",
    "notes",
];

/// Responsible for asynchronous interaction with the record service,
/// including transformation of row payloads into explicitly-defined types.
///
pub struct Backend {
    client: Client,
}

impl Backend {
    /// Returns a new instance for the given endpoint and credentials.
    ///
    pub fn new(url: &str, database: &str, username: &str, api_key: &str) -> Backend {
        debug!("Initializing backend client for {}...", url);
        Backend {
            client: Client::new(url, database, username, api_key),
        }
    }

    /// Returns person-in-charge summary rows matching the domain.
    ///
    pub async fn person_summaries(&mut self, domain: Value) -> Result<Vec<PersonSummary>> {
        let rows = self
            .client
            .search_read(
                ENTITY_PIC_OVERVIEW,
                domain,
                &[
                    "user_id",
                    "position",
                    "total_tasks",
                    "completed",
                    "in_progress",
                    "not_started",
                    "delayed",
                    "plan",
                    "overdue",
                ],
                SearchOptions {
                    order: Some("user_id asc".to_string()),
                    ..SearchOptions::default()
                },
            )
            .await?;
        let people = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<PersonSummary>, _>>()?;
        Ok(people)
    }

    /// Returns active departments visible under the caller's scope.
    ///
    pub async fn departments(&mut self, domain: Value) -> Result<Vec<Department>> {
        let rows = self
            .client
            .search_read(
                ENTITY_DEPARTMENT,
                domain,
                &["id", "name"],
                SearchOptions::default(),
            )
            .await?;
        let departments = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Department>, _>>()?;
        Ok(departments)
    }

    /// Attempts the privileged fetch of every active department, bypassing
    /// the caller's record scope. Servers reject this for callers without
    /// elevated visibility.
    ///
    pub async fn departments_full_scope(&mut self) -> Result<Vec<Department>> {
        let rows = self
            .client
            .call(
                ENTITY_DEPARTMENT,
                "search_read",
                json!([[["active", "=", true]]]),
                json!({ "fields": ["id", "name"], "context": { "full_scope": true } }),
            )
            .await?;
        let departments = serde_json::from_value::<Vec<Value>>(rows)?
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Department>, _>>()?;
        Ok(departments)
    }

    /// Returns assignments matching the domain.
    ///
    pub async fn assignments(&mut self, domain: Value) -> Result<Vec<Assignment>> {
        let rows = self
            .client
            .search_read(
                ENTITY_ASSIGNMENT,
                domain,
                &["user_id", "department_id"],
                SearchOptions::default(),
            )
            .await?;
        let assignments = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Assignment>, _>>()?;
        Ok(assignments)
    }

    /// Returns weekly reports matching the domain. `extra_fields` carries
    /// dynamic column keys that survived the availability probe; their
    /// values land on each record's `dynamic` list as display text.
    ///
    pub async fn weekly_reports(
        &mut self,
        domain: Value,
        extra_fields: &[String],
    ) -> Result<Vec<ReportRecord>> {
        let mut fields: Vec<&str> = REPORT_BASE_FIELDS.to_vec();
        for field in extra_fields {
            fields.push(field.as_str());
        }
        let rows = self
            .client
            .search_read(
                ENTITY_WEEKLY_REPORT,
                domain,
                &fields,
                SearchOptions {
                    order: Some("deadline asc, id asc".to_string()),
                    ..SearchOptions::default()
                },
            )
            .await?;
        let mut reports = Vec::with_capacity(rows.len());
        for row in rows {
            let mut report: ReportRecord = serde_json::from_value(row.clone())?;
            report.notes_text = strip_html(&report.notes);
            for field in extra_fields {
                let text = match row.get(field.as_str()) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Bool(false)) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                report.dynamic.push((field.clone(), text));
            }
            reports.push(report);
        }
        Ok(reports)
    }

    /// Returns dynamic column templates declared for the department.
    ///
    pub async fn field_templates(&mut self, department_id: i64) -> Result<Vec<FieldTemplate>> {
        let rows = self
            .client
            .search_read(
                ENTITY_FIELD_TEMPLATE,
                json!([["department_id", "=", department_id]]),
                &["name", "field_key"],
                SearchOptions::default(),
            )
            .await?;
        let templates = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<FieldTemplate>, _>>()?;
        Ok(templates)
    }

    /// Probe whether a declared dynamic column actually exists on the
    /// report entity.
    ///
    pub async fn field_exists(&mut self, model: &str, field: &str) -> Result<bool> {
        let result = self
            .client
            .call(model, "fields_get", json!([[field]]), json!({}))
            .await?;
        Ok(result
            .as_object()
            .map(|fields| fields.contains_key(field))
            .unwrap_or(false))
    }

    /// Ask the server to recompute person-in-charge statistics.
    ///
    pub async fn recompute_statistics(&mut self) -> Result<()> {
        info!("Requesting statistics recompute...");
        self.client
            .call(ENTITY_PIC_OVERVIEW, "update_all_stats", json!([]), json!({}))
            .await?;
        Ok(())
    }

    /// Probe whether the caller belongs to the given permission group.
    ///
    pub async fn has_group(&mut self, group: &str) -> Result<bool> {
        let result = self
            .client
            .call("res.users", "has_group", json!([group]), json!({}))
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    /// Classify the caller into a role by probing permission groups in
    /// priority order. First match wins; probe failures demote to the next
    /// candidate rather than erroring.
    ///
    pub async fn classify_role(&mut self) -> Role {
        for (role, group) in Role::PROBES {
            match self.has_group(group).await {
                Ok(true) => return role,
                Ok(false) => {}
                Err(e) => debug!("Group probe '{}' failed, skipping: {}", group, e),
            }
        }
        Role::Staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    async fn mock_login(server: &MockServer) {
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/jsonrpc")
                    .json_body_partial(r#"{"params": {"service": "common"}}"#);
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 1, "result": 3 }));
            })
            .await;
    }

    #[tokio::test]
    async fn person_summaries_typed() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/jsonrpc")
                    .json_body_partial(r#"{"params": {"service": "object"}}"#);
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "result": [{
                        "user_id": [3, "Bob Tan"],
                        "position": "Developer",
                        "total_tasks": 5,
                        "completed": 2,
                        "in_progress": 1,
                        "not_started": 1,
                        "delayed": 0,
                        "plan": 1,
                        "overdue": 0,
                    }],
                }));
            })
            .await;

        let mut backend = Backend::new(&server.base_url(), "prod", "alice", "secret");
        let people = backend.person_summaries(json!([])).await.unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].user.display, "Bob Tan");
        assert_eq!(people[0].total_tasks, 5);
    }

    #[tokio::test]
    async fn weekly_reports_strip_notes_and_collect_dynamic() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/jsonrpc")
                    .json_body_partial(r#"{"params": {"service": "object"}}"#);
                then.status(200).json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 2,
                    "result": [{
                        "id": 4,
                        "name": "WR-0004",
                        "pic_id": [3, "Bob Tan"],
                        "client_id": [9, "Acme"],
                        "project_task": "Rollout",
                        "deadline": "2024-07-01",
                        "status": "completed",
                        "progress": 100.0,
                        "notes": "<p>Done &amp; shipped</p>",
                        "x_field_remarks": "on budget",
                    }],
                }));
            })
            .await;

        let mut backend = Backend::new(&server.base_url(), "prod", "alice", "secret");
        let reports = backend
            .weekly_reports(json!([]), &["x_field_remarks".to_string()])
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].notes_text, "Done & shipped");
        assert_eq!(
            reports[0].dynamic,
            vec![("x_field_remarks".to_string(), "on budget".to_string())]
        );
    }

    #[tokio::test]
    async fn classify_role_first_match_wins() {
        let server = MockServer::start_async().await;
        mock_login(&server).await;
        server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/jsonrpc")
                    .json_body_partial(r#"{"params": {"service": "object"}}"#);
                then.status(200)
                    .json_body(json!({ "jsonrpc": "2.0", "id": 2, "result": true }));
            })
            .await;

        let mut backend = Backend::new(&server.base_url(), "prod", "alice", "secret");
        assert_eq!(backend.classify_role().await, Role::Board);
    }
}
