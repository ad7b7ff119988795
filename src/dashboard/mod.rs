//! Reporting dashboard core.
//!
//! This module holds the data pipeline behind the dashboard and its sibling
//! views: loading raw record sets from the backend, joining and rolling them
//! up, filtering/sorting/paginating the joined rows, and building the bar
//! chart specifications the UI renders.

pub mod aggregate;
pub mod charts;
pub mod filter;
pub mod loader;

pub use aggregate::{ChartSeries, TotalStats, UNASSIGNED};
pub use charts::{ChartRegistry, ChartSpec, DashboardPhase};
pub use filter::{FilterSet, Pager, ReportSortField, SortDirection, SortField, SortState};

use crate::backend::{Assignment, Department, PersonSummary, ReportRecord};
use std::collections::HashMap;

/// User-driven view parameters over the aggregated working set: filter
/// predicates, sort state, and pagination.
///
#[derive(Clone, Debug, Default)]
pub struct ViewQuery {
    pub filters: FilterSet,
    pub sort: Option<SortState>,
    pub pager: Pager,
}

/// The in-memory joined/aggregated snapshot owned by the active view.
/// Rebuilt wholesale on every load cycle and discarded on teardown; nothing
/// outside the owning state may mutate it.
///
#[derive(Clone, Debug, Default)]
pub struct WorkingSet {
    pub people: Vec<PersonSummary>,
    pub departments: Vec<Department>,
    pub assignments: Vec<Assignment>,
    pub reports: Vec<ReportRecord>,
    pub totals: TotalStats,
    pub chart_data: HashMap<i64, ChartSeries>,
    pub query: ViewQuery,
}

impl WorkingSet {
    /// Assemble a fresh working set from raw fetch results. Derived fields
    /// are left empty until `aggregate::aggregate` runs.
    ///
    pub fn new(
        people: Vec<PersonSummary>,
        departments: Vec<Department>,
        assignments: Vec<Assignment>,
        reports: Vec<ReportRecord>,
    ) -> WorkingSet {
        WorkingSet {
            people,
            departments,
            assignments,
            reports,
            ..WorkingSet::default()
        }
    }
}
