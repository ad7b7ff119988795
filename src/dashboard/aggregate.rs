//! Working-set aggregation.
//!
//! Joins the raw record sets by identity reference and computes the
//! per-department and global rollups the dashboard renders. Every function
//! here is a pure recomputation over the loaded snapshot; re-running
//! `aggregate` on unchanged input yields identical output.

use super::WorkingSet;
use crate::backend::{Assignment, Department, PersonSummary, ReportRecord};
use std::collections::HashMap;

/// Sentinel department label for people without a matching assignment.
pub const UNASSIGNED: &str = "-";

/// Global rollup of the seven status counters across all visible people.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TotalStats {
    pub total_tasks: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub not_started: u64,
    pub delayed: u64,
    pub plan: u64,
    pub overdue: u64,
}

/// Per-department chart series: one bar per person, valued by the number of
/// weekly reports that person authored.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Run the full aggregation pass over a freshly loaded working set.
///
pub fn aggregate(ws: &mut WorkingSet) {
    attach_departments(&mut ws.people, &ws.assignments);
    department_rollups(&mut ws.departments, &ws.assignments, &ws.people);
    ws.totals = calculate_total_stats(&ws.people);
    ws.chart_data = chart_series(&ws.departments, &ws.people, &ws.reports);
}

/// Attach each person's department from their assignment. The raw feed may
/// carry several assignments per person; the first match by user id wins.
/// People without a match get the unassigned sentinel and still count in
/// the global rollups.
///
pub fn attach_departments(people: &mut [PersonSummary], assignments: &[Assignment]) {
    for person in people.iter_mut() {
        match assignments.iter().find(|a| a.user.id == person.user.id) {
            Some(assignment) => {
                person.department_id = Some(assignment.department.id);
                person.department_name = assignment.department.display.clone();
            }
            None => {
                person.department_id = None;
                person.department_name = UNASSIGNED.to_string();
            }
        }
    }
}

/// Compute per-department member and task rollups, joined by department id.
///
pub fn department_rollups(
    departments: &mut [Department],
    assignments: &[Assignment],
    people: &[PersonSummary],
) {
    for dept in departments.iter_mut() {
        dept.total_users = assignments
            .iter()
            .filter(|a| a.department.id == dept.id)
            .count() as u32;
        dept.total_tasks = people
            .iter()
            .filter(|p| p.department_id == Some(dept.id))
            .map(|p| p.total_tasks)
            .sum();
    }
}

/// Sum the seven status counters across all people.
///
pub fn calculate_total_stats(people: &[PersonSummary]) -> TotalStats {
    let mut totals = TotalStats::default();
    for person in people {
        totals.total_tasks += u64::from(person.total_tasks);
        totals.completed += u64::from(person.completed);
        totals.in_progress += u64::from(person.in_progress);
        totals.not_started += u64::from(person.not_started);
        totals.delayed += u64::from(person.delayed);
        totals.plan += u64::from(person.plan);
        totals.overdue += u64::from(person.overdue);
    }
    totals
}

/// Build the per-department chart series: for each department, the ordered
/// (person display name, authored report count) pairs.
///
pub fn chart_series(
    departments: &[Department],
    people: &[PersonSummary],
    reports: &[ReportRecord],
) -> HashMap<i64, ChartSeries> {
    let mut data = HashMap::with_capacity(departments.len());
    for dept in departments {
        let mut series = ChartSeries::default();
        for person in people.iter().filter(|p| p.department_id == Some(dept.id)) {
            let authored = reports.iter().filter(|r| r.pic.id == person.user.id).count();
            series.labels.push(person.user.display.clone());
            series.values.push(authored as u64);
        }
        data.insert(dept.id, series);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordRef;

    fn person(id: i64, name: &str, total: u32, completed: u32) -> PersonSummary {
        PersonSummary {
            user: RecordRef {
                id,
                display: name.to_string(),
            },
            position: "Developer".to_string(),
            total_tasks: total,
            completed,
            in_progress: 0,
            not_started: 0,
            delayed: 0,
            plan: 0,
            overdue: 0,
            department_id: None,
            department_name: String::new(),
        }
    }

    fn assignment(user_id: i64, user: &str, dept_id: i64, dept: &str) -> Assignment {
        Assignment {
            user: RecordRef {
                id: user_id,
                display: user.to_string(),
            },
            department: RecordRef {
                id: dept_id,
                display: dept.to_string(),
            },
        }
    }

    fn department(id: i64, name: &str) -> Department {
        Department {
            id,
            name: name.to_string(),
            total_users: 0,
            total_tasks: 0,
        }
    }

    fn report(id: i64, pic_id: i64, pic: &str) -> ReportRecord {
        ReportRecord {
            id,
            name: format!("WR-{:04}", id),
            pic: RecordRef {
                id: pic_id,
                display: pic.to_string(),
            },
            client: None,
            project_task: String::new(),
            deadline: None,
            status: crate::backend::Status::Plan,
            progress: 0.0,
            notes: String::new(),
            notes_text: String::new(),
            dynamic: vec![],
        }
    }

    fn sample_working_set() -> WorkingSet {
        WorkingSet::new(
            vec![
                person(1, "Alice Chen", 5, 2),
                person(2, "Bob Tan", 3, 1),
                person(3, "Carol Lim", 4, 0),
            ],
            vec![department(10, "Engineering"), department(20, "Design")],
            vec![
                assignment(1, "Alice Chen", 10, "Engineering"),
                assignment(2, "Bob Tan", 10, "Engineering"),
            ],
            vec![report(1, 1, "Alice Chen"), report(2, 1, "Alice Chen"), report(3, 2, "Bob Tan")],
        )
    }

    #[test]
    fn attach_takes_first_assignment_match() {
        let mut people = vec![person(1, "Alice Chen", 5, 2)];
        let assignments = vec![
            assignment(1, "Alice Chen", 10, "Engineering"),
            assignment(1, "Alice Chen", 20, "Design"),
        ];
        attach_departments(&mut people, &assignments);
        assert_eq!(people[0].department_id, Some(10));
        assert_eq!(people[0].department_name, "Engineering");
    }

    #[test]
    fn unmatched_person_gets_sentinel_and_still_counts() {
        let mut ws = sample_working_set();
        aggregate(&mut ws);
        let carol = ws.people.iter().find(|p| p.user.id == 3).unwrap();
        assert_eq!(carol.department_name, UNASSIGNED);
        assert_eq!(carol.department_id, None);
        // Unassigned tasks still land in the global rollup
        assert_eq!(ws.totals.total_tasks, 12);
    }

    #[test]
    fn global_rollup_sums_counters() {
        let people = vec![person(1, "A", 5, 2), person(2, "B", 3, 1)];
        let totals = calculate_total_stats(&people);
        assert_eq!(totals.total_tasks, 8);
        assert_eq!(totals.completed, 3);
    }

    #[test]
    fn department_rollups_join_by_id() {
        let mut ws = sample_working_set();
        aggregate(&mut ws);
        let engineering = ws.departments.iter().find(|d| d.id == 10).unwrap();
        assert_eq!(engineering.total_users, 2);
        assert_eq!(engineering.total_tasks, 8);
        let design = ws.departments.iter().find(|d| d.id == 20).unwrap();
        assert_eq!(design.total_users, 0);
        assert_eq!(design.total_tasks, 0);
    }

    #[test]
    fn chart_series_counts_authored_reports() {
        let mut ws = sample_working_set();
        aggregate(&mut ws);
        let series = &ws.chart_data[&10];
        assert_eq!(series.labels, vec!["Alice Chen", "Bob Tan"]);
        assert_eq!(series.values, vec![2, 1]);
        assert_eq!(ws.chart_data[&20], ChartSeries::default());
    }

    #[test]
    fn aggregate_is_idempotent() {
        let mut once = sample_working_set();
        aggregate(&mut once);
        let mut twice = once.clone();
        aggregate(&mut twice);
        assert_eq!(once.totals, twice.totals);
        assert_eq!(once.departments, twice.departments);
        assert_eq!(once.chart_data, twice.chart_data);
        assert_eq!(once.people, twice.people);
    }
}
