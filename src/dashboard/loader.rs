//! Working-set loading.
//!
//! One load cycle per view activation (and per explicit refresh): the raw
//! record sets are fetched in a fixed order, the privileged department probe
//! decides whether the caller has elevated visibility, and the aggregation
//! pass runs synchronously before the set is handed back. A failed primary
//! fetch propagates to the caller; nothing here retries.

use super::{aggregate, WorkingSet};
use crate::backend::{Backend, FieldTemplate, ReportRecord, ENTITY_WEEKLY_REPORT};
use crate::state::StateError;
use anyhow::Result;
use log::*;
use serde_json::json;

/// Fetch every record set visible under the caller's scope and assemble the
/// aggregated working set.
///
/// Fetch order is fixed: people, departments, assignments, then the optional
/// privileged department probe, then reports. The aggregator never observes
/// a partially fetched set.
///
pub async fn load_all(backend: &mut Backend) -> Result<WorkingSet> {
    let people = backend.person_summaries(json!([])).await?;
    let mut departments = backend.departments(json!([["active", "=", true]])).await?;
    let assignments = backend.assignments(json!([["active", "=", true]])).await?;

    // A strictly larger privileged result set means the caller has elevated
    // visibility and gets the broader list; a rejected probe means scoped
    // data stands. Neither case is an error.
    match backend.departments_full_scope().await {
        Ok(all) if all.len() > departments.len() => {
            info!(
                "Privileged probe returned {} departments (scoped: {}); using full scope.",
                all.len(),
                departments.len()
            );
            departments = all;
        }
        Ok(_) => {}
        Err(e) => {
            debug!("Privileged department probe rejected, keeping scoped list: {}", e);
        }
    }

    let reports = backend.weekly_reports(json!([]), &[]).await?;

    let mut ws = WorkingSet::new(people, departments, assignments, reports);
    aggregate::aggregate(&mut ws);
    Ok(ws)
}

/// Load a working set restricted to one department's members. Used when the
/// caller is known to be scoped to exactly that department; no privileged
/// probe is attempted. A scope id that matches no department is an error,
/// not an empty set.
///
pub async fn load_for_department(backend: &mut Backend, department_id: i64) -> Result<WorkingSet> {
    let assignments = backend
        .assignments(json!([
            ["department_id", "=", department_id],
            ["active", "=", true]
        ]))
        .await?;
    let user_ids: Vec<i64> = assignments.iter().map(|a| a.user.id).collect();

    let people = backend
        .person_summaries(json!([["user_id", "in", user_ids]]))
        .await?;
    let departments = backend
        .departments(json!([["id", "=", department_id]]))
        .await?;
    if departments.is_empty() {
        return Err(StateError::DepartmentNotFound { id: department_id }.into());
    }
    let reports = backend
        .weekly_reports(json!([["pic_id", "in", user_ids]]), &[])
        .await?;

    let mut ws = WorkingSet::new(people, departments, assignments, reports);
    aggregate::aggregate(&mut ws);
    Ok(ws)
}

/// Load the weekly reports behind a department's detail view, including any
/// dynamic columns declared for that department. A declared column that
/// fails the availability probe is silently excluded for the rest of the
/// load; the probe result list preserves template order.
///
pub async fn load_department_reports(
    backend: &mut Backend,
    department_id: i64,
) -> Result<(Vec<ReportRecord>, Vec<FieldTemplate>)> {
    let assignments = backend
        .assignments(json!([
            ["department_id", "=", department_id],
            ["active", "=", true]
        ]))
        .await?;
    let user_ids: Vec<i64> = assignments.iter().map(|a| a.user.id).collect();

    let declared = match backend.field_templates(department_id).await {
        Ok(templates) => templates,
        Err(e) => {
            warn!(
                "Failed to load field templates for department {}: {}",
                department_id, e
            );
            vec![]
        }
    };

    let mut columns = Vec::with_capacity(declared.len());
    for template in declared {
        match backend
            .field_exists(ENTITY_WEEKLY_REPORT, &template.field_key)
            .await
        {
            Ok(true) => columns.push(template),
            Ok(false) => {
                debug!(
                    "Dynamic column '{}' not present on reports; excluding.",
                    template.field_key
                );
            }
            Err(e) => {
                debug!(
                    "Availability probe for dynamic column '{}' failed, excluding: {}",
                    template.field_key, e
                );
            }
        }
    }

    let field_keys: Vec<String> = columns.iter().map(|c| c.field_key.clone()).collect();
    let reports = backend
        .weekly_reports(json!([["pic_id", "in", user_ids]]), &field_keys)
        .await?;
    Ok((reports, columns))
}
