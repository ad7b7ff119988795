//! Filter, sort, and pagination engine over the aggregated working set.
//!
//! Filtering is an order-preserving subset of the input rows; sorting is
//! stable with an explicit equal case; pagination clamps navigation rather
//! than the slice itself.

use crate::backend::{PersonSummary, ReportRecord, Status};
use std::cmp::Ordering;

/// User-driven filter predicates for the people table. Empty fields pass
/// everything.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub search: String,
    pub department: String,
    pub role: String,
    pub status: Option<Status>,
}

impl FilterSet {
    /// True when no predicate is active.
    ///
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.department.is_empty()
            && self.role.is_empty()
            && self.status.is_none()
    }

    /// Clear every predicate.
    ///
    pub fn reset(&mut self) {
        *self = FilterSet::default();
    }

    fn matches(&self, person: &PersonSummary) -> bool {
        let name_match = person
            .user
            .display
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let dept_match = self.department.is_empty() || person.department_name == self.department;
        let role_match = self.role.is_empty() || person.position == self.role;
        let status_match = self
            .status
            .map_or(true, |status| person.status_count(status) > 0);
        name_match && dept_match && role_match && status_match
    }
}

/// Apply the filter predicates, preserving input order.
///
pub fn apply_filters(people: &[PersonSummary], filters: &FilterSet) -> Vec<PersonSummary> {
    people
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

/// Sort direction for a column.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Sortable columns of the people table.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Person,
    Department,
    Position,
    TotalTasks,
    Completed,
    InProgress,
    NotStarted,
    Delayed,
    Plan,
    Overdue,
}

impl SortField {
    /// Column cycle order used by the sort hotkey.
    ///
    pub const ALL: [SortField; 10] = [
        SortField::Person,
        SortField::Department,
        SortField::Position,
        SortField::TotalTasks,
        SortField::Completed,
        SortField::InProgress,
        SortField::NotStarted,
        SortField::Delayed,
        SortField::Plan,
        SortField::Overdue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::Person => "person",
            SortField::Department => "department",
            SortField::Position => "position",
            SortField::TotalTasks => "total",
            SortField::Completed => "completed",
            SortField::InProgress => "in progress",
            SortField::NotStarted => "not started",
            SortField::Delayed => "delayed",
            SortField::Plan => "plan",
            SortField::Overdue => "overdue",
        }
    }
}

/// Current sort column and direction.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Invoking sort on the current field toggles direction; a new field
    /// resets to ascending.
    ///
    pub fn toggle(current: Option<SortState>, field: SortField) -> SortState {
        match current {
            Some(state) if state.field == field => SortState {
                field,
                direction: state.direction.toggled(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Ascending,
            },
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable sort of people rows by the given column. The person column
/// compares the display-name component of the reference, not the raw id.
///
pub fn sort_people(rows: &mut [PersonSummary], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = match field {
            SortField::Person => cmp_text(&a.user.display, &b.user.display),
            SortField::Department => cmp_text(&a.department_name, &b.department_name),
            SortField::Position => cmp_text(&a.position, &b.position),
            SortField::TotalTasks => a.total_tasks.cmp(&b.total_tasks),
            SortField::Completed => a.completed.cmp(&b.completed),
            SortField::InProgress => a.in_progress.cmp(&b.in_progress),
            SortField::NotStarted => a.not_started.cmp(&b.not_started),
            SortField::Delayed => a.delayed.cmp(&b.delayed),
            SortField::Plan => a.plan.cmp(&b.plan),
            SortField::Overdue => a.overdue.cmp(&b.overdue),
        };
        direction.apply(ord)
    });
}

/// Sortable columns of a department's report list.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportSortField {
    Name,
    Pic,
    Client,
    ProjectTask,
    Deadline,
    Status,
    Progress,
}

impl ReportSortField {
    pub const ALL: [ReportSortField; 7] = [
        ReportSortField::Name,
        ReportSortField::Pic,
        ReportSortField::Client,
        ReportSortField::ProjectTask,
        ReportSortField::Deadline,
        ReportSortField::Status,
        ReportSortField::Progress,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportSortField::Name => "number",
            ReportSortField::Pic => "pic",
            ReportSortField::Client => "client",
            ReportSortField::ProjectTask => "task",
            ReportSortField::Deadline => "deadline",
            ReportSortField::Status => "status",
            ReportSortField::Progress => "progress",
        }
    }
}

/// Stable sort of report rows. Reference columns compare display names;
/// an unset client sorts before any named one.
///
pub fn sort_reports(rows: &mut [ReportRecord], field: ReportSortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = match field {
            ReportSortField::Name => cmp_text(&a.name, &b.name),
            ReportSortField::Pic => cmp_text(&a.pic.display, &b.pic.display),
            ReportSortField::Client => cmp_text(a.client_display(), b.client_display()),
            ReportSortField::ProjectTask => cmp_text(&a.project_task, &b.project_task),
            ReportSortField::Deadline => a.deadline.cmp(&b.deadline),
            ReportSortField::Status => a.status.as_str().cmp(b.status.as_str()),
            ReportSortField::Progress => a
                .progress
                .partial_cmp(&b.progress)
                .unwrap_or(Ordering::Equal),
        };
        direction.apply(ord)
    });
}

/// One-indexed pagination over a filtered/sorted sequence.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pager {
    fn default() -> Pager {
        Pager {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pager {
    pub fn with_page_size(page_size: usize) -> Pager {
        Pager {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Number of pages for the given row count.
    ///
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// The current page's rows. Never more than `page_size` of them; an
    /// out-of-range page yields an empty slice.
    ///
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.page - 1) * self.page_size;
        if start >= rows.len() {
            return &[];
        }
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }

    /// Jump to a page; out-of-range requests are no-ops.
    ///
    pub fn go_to_page(&mut self, page: usize, count: usize) {
        if page >= 1 && page <= self.total_pages(count) {
            self.page = page;
        }
    }

    /// Advance one page; a no-op on the last page.
    ///
    pub fn next_page(&mut self, count: usize) {
        if self.page < self.total_pages(count) {
            self.page += 1;
        }
    }

    /// Back one page; a no-op on the first page.
    ///
    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Back to page one. Every filter change calls this.
    ///
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Change the page size and reset to page one.
    ///
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordRef;

    fn person(id: i64, name: &str, dept: &str, position: &str, overdue: u32) -> PersonSummary {
        PersonSummary {
            user: RecordRef {
                id,
                display: name.to_string(),
            },
            position: position.to_string(),
            total_tasks: overdue + 2,
            completed: 1,
            in_progress: 1,
            not_started: 0,
            delayed: 0,
            plan: 0,
            overdue,
            department_id: None,
            department_name: dept.to_string(),
        }
    }

    fn sample_people() -> Vec<PersonSummary> {
        vec![
            person(1, "Alice Chen", "Engineering", "Developer", 0),
            person(2, "Bob Tan", "Design", "Designer", 2),
            person(3, "Carol Lim", "Engineering", "Developer", 1),
            person(4, "Dan Alvarez", "-", "Analyst", 0),
        ]
    }

    #[test]
    fn filters_produce_order_preserving_subset() {
        let people = sample_people();
        let filters = FilterSet {
            department: "Engineering".to_string(),
            ..FilterSet::default()
        };
        let filtered = apply_filters(&people, &filters);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].user.display, "Alice Chen");
        assert_eq!(filtered[1].user.display, "Carol Lim");
        for row in &filtered {
            assert!(people.contains(row));
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let people = sample_people();
        let filters = FilterSet {
            search: "aLiCe".to_string(),
            ..FilterSet::default()
        };
        let filtered = apply_filters(&people, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user.display, "Alice Chen");
    }

    #[test]
    fn status_filter_requires_positive_counter() {
        let people = sample_people();
        let filters = FilterSet {
            status: Some(Status::Overdue),
            ..FilterSet::default()
        };
        let filtered = apply_filters(&people, &filters);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.overdue > 0));
    }

    #[test]
    fn combined_filters_are_conjunctive() {
        let people = sample_people();
        let filters = FilterSet {
            search: "c".to_string(),
            department: "Engineering".to_string(),
            role: "Developer".to_string(),
            status: Some(Status::Overdue),
        };
        let filtered = apply_filters(&people, &filters);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user.display, "Carol Lim");
    }

    #[test]
    fn sort_toggle_same_field_flips_direction() {
        let state = SortState::toggle(None, SortField::Person);
        assert_eq!(state.direction, SortDirection::Ascending);
        let state = SortState::toggle(Some(state), SortField::Person);
        assert_eq!(state.direction, SortDirection::Descending);
        let state = SortState::toggle(Some(state), SortField::TotalTasks);
        assert_eq!(state.field, SortField::TotalTasks);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_round_trip_restores_order() {
        let mut rows = sample_people();
        sort_people(&mut rows, SortField::Person, SortDirection::Ascending);
        let ascending: Vec<String> = rows.iter().map(|p| p.user.display.clone()).collect();
        sort_people(&mut rows, SortField::Person, SortDirection::Descending);
        let descending: Vec<String> = rows.iter().map(|p| p.user.display.clone()).collect();
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
        sort_people(&mut rows, SortField::Person, SortDirection::Ascending);
        let again: Vec<String> = rows.iter().map(|p| p.user.display.clone()).collect();
        assert_eq!(again, ascending);
    }

    #[test]
    fn sort_person_compares_display_name_not_id() {
        let mut rows = vec![
            person(1, "Zed Ortiz", "Engineering", "Developer", 0),
            person(9, "Amy Wu", "Engineering", "Developer", 0),
        ];
        sort_people(&mut rows, SortField::Person, SortDirection::Ascending);
        assert_eq!(rows[0].user.display, "Amy Wu");
    }

    #[test]
    fn pager_slices_never_exceed_page_size() {
        let rows: Vec<u32> = (0..23).collect();
        let mut pager = Pager::default();
        assert_eq!(pager.total_pages(rows.len()), 3);
        let mut seen = Vec::new();
        loop {
            let page = pager.slice(&rows);
            assert!(page.len() <= pager.page_size);
            seen.extend_from_slice(page);
            let before = pager.page;
            pager.next_page(rows.len());
            if pager.page == before {
                break;
            }
        }
        assert_eq!(seen, rows);
    }

    #[test]
    fn pager_go_to_out_of_range_is_noop() {
        let mut pager = Pager::default();
        pager.go_to_page(2, 23);
        assert_eq!(pager.page, 2);
        pager.go_to_page(4, 23);
        assert_eq!(pager.page, 2);
        pager.go_to_page(0, 23);
        assert_eq!(pager.page, 2);
    }

    #[test]
    fn pager_next_prev_clamp_at_bounds() {
        let mut pager = Pager::default();
        pager.prev_page();
        assert_eq!(pager.page, 1);
        pager.go_to_page(3, 23);
        pager.next_page(23);
        assert_eq!(pager.page, 3);
    }

    #[test]
    fn pager_zero_page_size_clamps_to_one() {
        let pager = Pager::with_page_size(0);
        assert_eq!(pager.page_size, 1);
        assert_eq!(pager.total_pages(3), 3);

        let mut pager = Pager::default();
        pager.set_page_size(0);
        assert_eq!(pager.page_size, 1);
    }

    #[test]
    fn pager_empty_rows_has_zero_pages() {
        let pager = Pager::default();
        assert_eq!(pager.total_pages(0), 0);
        let empty: [u32; 0] = [];
        assert!(pager.slice(&empty).is_empty());
    }

    #[test]
    fn report_sort_client_treats_unset_as_empty() {
        use crate::backend::Status as ReportStatus;
        let with_client = ReportRecord {
            id: 1,
            name: "WR-0001".to_string(),
            pic: RecordRef {
                id: 1,
                display: "Alice Chen".to_string(),
            },
            client: Some(RecordRef {
                id: 5,
                display: "Acme".to_string(),
            }),
            project_task: String::new(),
            deadline: None,
            status: ReportStatus::Plan,
            progress: 0.0,
            notes: String::new(),
            notes_text: String::new(),
            dynamic: vec![],
        };
        let mut without_client = with_client.clone();
        without_client.id = 2;
        without_client.client = None;
        let mut rows = vec![with_client, without_client];
        sort_reports(&mut rows, ReportSortField::Client, SortDirection::Ascending);
        assert_eq!(rows[0].id, 2);
    }
}
