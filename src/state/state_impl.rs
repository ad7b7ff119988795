use crate::app::{ConfigSaveSender, NetworkEventSender};
use crate::backend::{Department, FieldTemplate, PersonSummary, ReportRecord, Role, Status};
use crate::dashboard::charts::build_chart_specs;
use crate::dashboard::filter::{apply_filters, sort_people, sort_reports};
use crate::dashboard::{
    ChartRegistry, Pager, ReportSortField, SortDirection, SortField, SortState, TotalStats,
    WorkingSet,
};
use crate::events::network::Event as NetworkEvent;
use crate::ui::SPINNER_FRAME_COUNT;
use log::*;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::collections::HashSet;

use super::navigation::{visible_views, View};
use super::StateError;

/// Report table columns that are always available, keyed for the visibility
/// toggles. Dynamic columns come in per department on top of these.
pub const REPORT_COLUMNS: [&str; 8] = [
    "name",
    "pic",
    "client",
    "project_task",
    "deadline",
    "status",
    "progress",
    "notes",
];

/// Reports paginate coarser than the people table.
const REPORT_PAGE_SIZE: usize = 20;

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    role: Role,
    department_scope: Option<i64>,
    terminal_size: Rect,
    spinner_index: usize,
    tab_index: usize,
    view_stack: Vec<View>,
    working_set: WorkingSet,
    load_generation: u64,
    loading: bool,
    charts: ChartRegistry,
    filtered_people: Vec<PersonSummary>,
    people_list_state: ListState,
    departments_list_state: ListState,
    detail_department: Option<Department>,
    report_rows: Vec<ReportRecord>,
    detail_columns: Vec<FieldTemplate>,
    report_sort: Option<(ReportSortField, SortDirection)>,
    report_pager: Pager,
    visible_columns: HashSet<String>,
    search_mode: bool,
    notice: Option<String>,
    debug_mode: bool,
    theme: crate::ui::Theme,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            config_save_sender: None,
            role: Role::Staff,
            department_scope: None,
            terminal_size: Rect::default(),
            spinner_index: 0,
            tab_index: 0,
            view_stack: vec![],
            working_set: WorkingSet::default(),
            load_generation: 0,
            loading: false,
            charts: ChartRegistry::default(),
            filtered_people: vec![],
            people_list_state: ListState::default(),
            departments_list_state: ListState::default(),
            detail_department: None,
            report_rows: vec![],
            detail_columns: vec![],
            report_sort: None,
            report_pager: Pager::with_page_size(REPORT_PAGE_SIZE),
            visible_columns: REPORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            search_mode: false,
            notice: None,
            debug_mode: false,
            theme: crate::ui::Theme::default(),
        }
    }
}

impl State {
    pub fn new(
        net_sender: NetworkEventSender,
        config_save_sender: ConfigSaveSender,
        theme: crate::ui::Theme,
        visible_columns: Vec<String>,
    ) -> Self {
        let mut state = State {
            net_sender: Some(net_sender),
            config_save_sender: Some(config_save_sender),
            theme,
            ..State::default()
        };
        if !visible_columns.is_empty() {
            state.visible_columns = visible_columns.into_iter().collect();
        }
        state
    }

    /// Send a network event for asynchronous handling.
    ///
    pub fn dispatch(&self, event: NetworkEvent) {
        if let Some(sender) = &self.net_sender {
            if let Err(e) = sender.send(event) {
                error!("Failed to dispatch network event: {}", e);
            }
        }
    }

    /// Get the current theme.
    ///
    pub fn get_theme(&self) -> &crate::ui::Theme {
        &self.theme
    }

    /// Sets the terminal size.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index += 1;
        if self.spinner_index >= SPINNER_FRAME_COUNT {
            self.spinner_index = 0;
        }
        self
    }

    /// Return the current spinner index.
    ///
    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    // Role and view navigation

    /// Return the caller's classified role.
    ///
    pub fn get_role(&self) -> Role {
        self.role
    }

    /// Apply the classified role, resetting navigation to the first tab the
    /// role may see.
    ///
    pub fn set_role(&mut self, role: Role) -> &mut Self {
        self.role = role;
        self.tab_index = 0;
        self.view_stack.clear();
        self
    }

    /// The tabs visible to the current role.
    ///
    pub fn tabs(&self) -> &'static [View] {
        visible_views(self.role)
    }

    /// Return the index of the active tab.
    ///
    pub fn tab_index(&self) -> usize {
        self.tab_index
    }

    /// Return the current view: a pushed detail view wins over the tab.
    ///
    pub fn current_view(&self) -> View {
        self.view_stack
            .last()
            .copied()
            .unwrap_or_else(|| self.tabs()[self.tab_index])
    }

    /// Activate the next tab.
    ///
    pub fn next_tab(&mut self) -> &mut Self {
        let leaving = self.current_view();
        self.view_stack.clear();
        self.tab_index = (self.tab_index + 1) % self.tabs().len();
        self.after_view_change(leaving);
        self
    }

    /// Activate the previous tab.
    ///
    pub fn previous_tab(&mut self) -> &mut Self {
        let leaving = self.current_view();
        self.view_stack.clear();
        let tabs = self.tabs().len();
        self.tab_index = if self.tab_index == 0 {
            tabs - 1
        } else {
            self.tab_index - 1
        };
        self.after_view_change(leaving);
        self
    }

    /// Jump straight to a tab if the role may see it.
    ///
    pub fn activate_tab(&mut self, view: View) -> &mut Self {
        if let Some(index) = self.tabs().iter().position(|v| *v == view) {
            let leaving = self.current_view();
            self.view_stack.clear();
            self.tab_index = index;
            self.after_view_change(leaving);
        }
        self
    }

    /// Pop the pushed detail view, if any.
    ///
    pub fn pop_view(&mut self) -> Option<View> {
        let popped = self.view_stack.pop();
        if popped.is_some() {
            self.detail_department = None;
            self.report_rows = self.working_set.reports.clone();
            self.detail_columns.clear();
            self.report_sort = None;
            self.report_pager.reset();
        }
        popped
    }

    /// Charts are rendering artifacts; leaving the dashboard tears them down
    /// so a return re-renders from fresh data signals.
    fn after_view_change(&mut self, leaving: View) {
        if leaving == View::Dashboard && self.current_view() != View::Dashboard {
            self.charts.clear();
        }
    }

    // Loading and the working set

    /// Start a load cycle, returning its generation tag. Results carrying an
    /// older tag are discarded on arrival.
    ///
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.loading = true;
        self.charts.begin_loading();
        self.load_generation
    }

    /// Whether a load cycle is in flight.
    ///
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Install a freshly loaded working set. Stale generations are dropped;
    /// a newer load has already superseded them.
    ///
    pub fn install_working_set(&mut self, working_set: WorkingSet, generation: u64) -> &mut Self {
        if generation != self.load_generation {
            debug!(
                "Discarding stale working set (generation {} < {}).",
                generation, self.load_generation
            );
            return self;
        }
        self.loading = false;
        self.working_set = working_set;
        self.refresh_derived();
        self.report_rows = self.working_set.reports.clone();
        self.report_sort = None;
        self.report_pager.reset();
        self.charts.install(build_chart_specs(&self.working_set));
        self
    }

    /// Record a failed load: the view falls back to an empty working set
    /// rather than stale rows, and the failure surfaces in the footer.
    ///
    pub fn load_failed(&mut self, generation: u64, message: String) -> &mut Self {
        if generation != self.load_generation {
            return self;
        }
        self.loading = false;
        self.working_set = WorkingSet::default();
        self.refresh_derived();
        self.charts.clear();
        self.set_notice(message);
        self
    }

    /// Return the aggregated working set.
    ///
    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    /// Return the global status rollup.
    ///
    pub fn totals(&self) -> TotalStats {
        self.working_set.totals
    }

    /// Recompute the filtered/sorted people rows and clamp pagination and
    /// selection to the new row count.
    fn refresh_derived(&mut self) {
        let query = &self.working_set.query;
        let mut rows = apply_filters(&self.working_set.people, &query.filters);
        if let Some(sort) = query.sort {
            sort_people(&mut rows, sort.field, sort.direction);
        }
        self.filtered_people = rows;

        let count = self.filtered_people.len();
        let pager = &mut self.working_set.query.pager;
        let total = pager.total_pages(count);
        if total == 0 {
            pager.reset();
        } else if pager.page > total {
            pager.go_to_page(total, count);
        }

        let page_len = self
            .working_set
            .query
            .pager
            .slice(&self.filtered_people)
            .len();
        if page_len == 0 {
            self.people_list_state.select(None);
        } else {
            match self.people_list_state.selected() {
                Some(i) if i < page_len => {}
                _ => self.people_list_state.select(Some(0)),
            }
        }
    }

    // People table: filtering, sorting, pagination

    /// The filtered and sorted people rows across all pages.
    ///
    pub fn filtered_people(&self) -> &[PersonSummary] {
        &self.filtered_people
    }

    /// The current page of people rows.
    ///
    pub fn visible_people(&self) -> &[PersonSummary] {
        self.working_set.query.pager.slice(&self.filtered_people)
    }

    pub fn people_pager(&self) -> Pager {
        self.working_set.query.pager
    }

    pub fn people_sort(&self) -> Option<SortState> {
        self.working_set.query.sort
    }

    pub fn filters(&self) -> &crate::dashboard::FilterSet {
        &self.working_set.query.filters
    }

    pub fn get_people_list_state(&mut self) -> &mut ListState {
        &mut self.people_list_state
    }

    /// Enter incremental search mode.
    ///
    pub fn enter_search_mode(&mut self) -> &mut Self {
        self.search_mode = true;
        self
    }

    /// Leave search mode, keeping the query applied.
    ///
    pub fn exit_search_mode(&mut self) -> &mut Self {
        self.search_mode = false;
        self
    }

    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    /// Append a character to the search query. Filter edits restart at the
    /// first page.
    ///
    pub fn add_search_char(&mut self, c: char) -> &mut Self {
        self.working_set.query.filters.search.push(c);
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Remove the last character of the search query.
    ///
    pub fn backspace_search(&mut self) -> &mut Self {
        self.working_set.query.filters.search.pop();
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Cycle the department filter through every loaded department and back
    /// to unfiltered.
    ///
    pub fn cycle_department_filter(&mut self) -> &mut Self {
        let options: Vec<String> = self
            .working_set
            .departments
            .iter()
            .map(|d| d.name.clone())
            .collect();
        let current = self.working_set.query.filters.department.clone();
        self.working_set.query.filters.department = next_option(&options, &current);
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Cycle the position filter through every distinct position label.
    ///
    pub fn cycle_role_filter(&mut self) -> &mut Self {
        let mut options: Vec<String> = self
            .working_set
            .people
            .iter()
            .map(|p| p.position.clone())
            .filter(|p| !p.is_empty())
            .collect();
        options.sort();
        options.dedup();
        let current = self.working_set.query.filters.role.clone();
        self.working_set.query.filters.role = next_option(&options, &current);
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Cycle the status filter through every status and back to unfiltered.
    ///
    pub fn cycle_status_filter(&mut self) -> &mut Self {
        let next = match self.working_set.query.filters.status {
            None => Some(Status::ALL[0]),
            Some(current) => Status::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| Status::ALL.get(i + 1))
                .copied(),
        };
        self.working_set.query.filters.status = next;
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Clear every filter predicate.
    ///
    pub fn clear_filters(&mut self) -> &mut Self {
        self.working_set.query.filters.reset();
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self
    }

    /// Sort by the given column: same column toggles direction, a new column
    /// starts ascending.
    ///
    pub fn toggle_sort(&mut self, field: SortField) -> &mut Self {
        let next = SortState::toggle(self.working_set.query.sort, field);
        self.working_set.query.sort = Some(next);
        self.refresh_derived();
        self
    }

    /// Advance the sort column through the cycle order.
    ///
    pub fn cycle_sort_field(&mut self) -> &mut Self {
        let next_field = match self.working_set.query.sort {
            None => SortField::ALL[0],
            Some(state) => {
                let i = SortField::ALL
                    .iter()
                    .position(|f| *f == state.field)
                    .unwrap_or(0);
                SortField::ALL[(i + 1) % SortField::ALL.len()]
            }
        };
        self.working_set.query.sort = Some(SortState {
            field: next_field,
            direction: SortDirection::Ascending,
        });
        self.refresh_derived();
        self
    }

    /// Flip the sort direction of the current column.
    ///
    pub fn toggle_sort_direction(&mut self) -> &mut Self {
        if let Some(state) = self.working_set.query.sort {
            self.working_set.query.sort = Some(SortState {
                field: state.field,
                direction: state.direction.toggled(),
            });
            self.refresh_derived();
        }
        self
    }

    /// Advance the people table one page.
    ///
    pub fn next_people_page(&mut self) -> &mut Self {
        let count = self.filtered_people.len();
        self.working_set.query.pager.next_page(count);
        self.people_list_state.select(Some(0));
        self
    }

    /// Back the people table one page.
    ///
    pub fn previous_people_page(&mut self) -> &mut Self {
        self.working_set.query.pager.prev_page();
        self.people_list_state.select(Some(0));
        self
    }

    /// Activate the next person on the current page.
    ///
    pub fn next_person(&mut self) -> &mut Self {
        let page_len = self.visible_people().len();
        if page_len == 0 {
            self.people_list_state.select(None);
            return self;
        }
        let next = match self.people_list_state.selected() {
            Some(i) if i + 1 < page_len => i + 1,
            _ => 0,
        };
        self.people_list_state.select(Some(next));
        self
    }

    /// Activate the previous person on the current page.
    ///
    pub fn previous_person(&mut self) -> &mut Self {
        let page_len = self.visible_people().len();
        if page_len == 0 {
            self.people_list_state.select(None);
            return self;
        }
        let prev = match self.people_list_state.selected() {
            Some(0) | None => page_len - 1,
            Some(i) => i - 1,
        };
        self.people_list_state.select(Some(prev));
        self
    }

    /// Narrow the people table to one person by display name and bring the
    /// people view forward. Used by chart bar selection. Only the search
    /// predicate changes; other active filters stay in force.
    ///
    pub fn filter_by_person(&mut self, name: &str) -> Result<(), StateError> {
        if !self
            .working_set
            .people
            .iter()
            .any(|p| p.user.display.eq_ignore_ascii_case(name))
        {
            return Err(StateError::PersonNotFound {
                name: name.to_string(),
            });
        }
        self.working_set.query.filters.search = name.to_lowercase();
        self.working_set.query.pager.reset();
        self.refresh_derived();
        self.activate_tab(View::People);
        Ok(())
    }

    // Dashboard charts

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut ChartRegistry {
        &mut self.charts
    }

    /// Act on the chart bar under the cursor: jump to the people view,
    /// filtered down to that person.
    ///
    pub fn select_chart_bar(&mut self) -> &mut Self {
        if let Some(name) = self.charts.selected_person().map(str::to_string) {
            if let Err(e) = self.filter_by_person(&name) {
                warn!("Chart selection no longer resolves: {}", e);
                self.set_notice(e.to_string());
            }
        }
        self
    }

    // Departments and the detail view

    pub fn get_departments_list_state(&mut self) -> &mut ListState {
        &mut self.departments_list_state
    }

    /// Activate the next department row.
    ///
    pub fn next_department(&mut self) -> &mut Self {
        let len = self.working_set.departments.len();
        if len == 0 {
            self.departments_list_state.select(None);
            return self;
        }
        let next = match self.departments_list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.departments_list_state.select(Some(next));
        self
    }

    /// Activate the previous department row.
    ///
    pub fn previous_department(&mut self) -> &mut Self {
        let len = self.working_set.departments.len();
        if len == 0 {
            self.departments_list_state.select(None);
            return self;
        }
        let prev = match self.departments_list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.departments_list_state.select(Some(prev));
        self
    }

    /// Return the department row under the cursor.
    ///
    pub fn selected_department(&self) -> Option<&Department> {
        self.departments_list_state
            .selected()
            .and_then(|i| self.working_set.departments.get(i))
    }

    /// Open the detail view for the department under the cursor and request
    /// its reports.
    ///
    pub fn open_department_detail(&mut self) -> &mut Self {
        let Some(department) = self.selected_department().cloned() else {
            return self;
        };
        let department_id = department.id;
        self.detail_department = Some(department);
        self.report_rows.clear();
        self.detail_columns.clear();
        self.report_sort = None;
        self.report_pager.reset();
        self.view_stack.push(View::DepartmentDetail);
        let generation = self.begin_load();
        self.dispatch(NetworkEvent::DepartmentReports {
            generation,
            department_id,
        });
        self
    }

    pub fn detail_department(&self) -> Option<&Department> {
        self.detail_department.as_ref()
    }

    /// Install the loaded detail reports and their dynamic columns.
    ///
    pub fn set_department_reports(
        &mut self,
        reports: Vec<ReportRecord>,
        columns: Vec<FieldTemplate>,
        generation: u64,
    ) -> &mut Self {
        if generation != self.load_generation {
            debug!(
                "Discarding stale department reports (generation {}).",
                generation
            );
            return self;
        }
        self.loading = false;
        self.report_rows = reports;
        self.detail_columns = columns;
        self.report_pager.reset();
        self
    }

    /// The report table rows: the working set's reports, or the open
    /// department's once a detail view loads. Kept in current sort order.
    ///
    pub fn report_rows(&self) -> &[ReportRecord] {
        &self.report_rows
    }

    /// The current page of report rows.
    ///
    pub fn visible_reports(&self) -> &[ReportRecord] {
        self.report_pager.slice(&self.report_rows)
    }

    pub fn detail_columns(&self) -> &[FieldTemplate] {
        &self.detail_columns
    }

    pub fn report_pager(&self) -> Pager {
        self.report_pager
    }

    pub fn report_sort(&self) -> Option<(ReportSortField, SortDirection)> {
        self.report_sort
    }

    /// Sort the open department's reports: same column toggles direction.
    ///
    pub fn toggle_report_sort(&mut self, field: ReportSortField) -> &mut Self {
        let direction = match self.report_sort {
            Some((current, direction)) if current == field => direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.report_sort = Some((field, direction));
        sort_reports(&mut self.report_rows, field, direction);
        self
    }

    /// Advance the report sort column through the cycle order.
    ///
    pub fn cycle_report_sort(&mut self) -> &mut Self {
        let next_field = match self.report_sort {
            None => ReportSortField::ALL[0],
            Some((field, _)) => {
                let i = ReportSortField::ALL
                    .iter()
                    .position(|f| *f == field)
                    .unwrap_or(0);
                ReportSortField::ALL[(i + 1) % ReportSortField::ALL.len()]
            }
        };
        self.report_sort = Some((next_field, SortDirection::Ascending));
        sort_reports(
            &mut self.report_rows,
            next_field,
            SortDirection::Ascending,
        );
        self
    }

    pub fn next_report_page(&mut self) -> &mut Self {
        let count = self.report_rows.len();
        self.report_pager.next_page(count);
        self
    }

    pub fn previous_report_page(&mut self) -> &mut Self {
        self.report_pager.prev_page();
        self
    }

    // Report column visibility

    /// Whether a report column is enabled.
    ///
    pub fn column_visible(&self, key: &str) -> bool {
        self.visible_columns.contains(key)
    }

    /// Toggle a report column and persist the preference.
    ///
    pub fn toggle_column(&mut self, key: &str) -> &mut Self {
        if !self.visible_columns.remove(key) {
            self.visible_columns.insert(key.to_string());
        }
        if let Some(sender) = &self.config_save_sender {
            let _ = sender.send(());
        }
        self
    }

    /// Enabled column keys, for config persistence.
    ///
    pub fn get_visible_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = self.visible_columns.iter().cloned().collect();
        columns.sort();
        columns
    }

    // Footer notices and the log pane

    /// Surface a message in the footer until the next notice replaces it.
    ///
    pub fn set_notice(&mut self, message: String) -> &mut Self {
        info!("{}", message);
        self.notice = Some(message);
        self
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_notice(&mut self) -> &mut Self {
        self.notice = None;
        self
    }

    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn toggle_debug_mode(&mut self) -> &mut Self {
        self.debug_mode = !self.debug_mode;
        self
    }

    // Requests

    /// Fix the department scope applied at startup. Refreshes reload within
    /// the same scope.
    ///
    pub fn set_department_scope(&mut self, department_id: Option<i64>) -> &mut Self {
        self.department_scope = department_id;
        self
    }

    /// Request a reload of the working set under the current scope.
    ///
    pub fn request_refresh(&mut self) -> &mut Self {
        let generation = self.begin_load();
        match self.department_scope {
            Some(department_id) => self.dispatch(NetworkEvent::LoadDepartment {
                generation,
                department_id,
            }),
            None => self.dispatch(NetworkEvent::LoadAll { generation }),
        }
        self
    }

    /// Ask the server to recompute summary statistics, then reload.
    ///
    pub fn request_recompute(&mut self) -> &mut Self {
        self.set_notice("Recomputing statistics...".to_string());
        self.dispatch(NetworkEvent::RecomputeStats);
        self
    }
}

/// Step through `options` from `current`, returning empty (unfiltered) after
/// the last option.
fn next_option(options: &[String], current: &str) -> String {
    if current.is_empty() {
        return options.first().cloned().unwrap_or_default();
    }
    match options.iter().position(|o| o == current) {
        Some(i) => options.get(i + 1).cloned().unwrap_or_default(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Assignment, RecordRef};
    use crate::dashboard::aggregate;

    fn person(id: i64, name: &str) -> PersonSummary {
        PersonSummary {
            user: RecordRef {
                id,
                display: name.to_string(),
            },
            position: "Developer".to_string(),
            total_tasks: 3,
            completed: 1,
            in_progress: 1,
            not_started: 1,
            delayed: 0,
            plan: 0,
            overdue: 0,
            department_id: None,
            department_name: String::new(),
        }
    }

    fn loaded_working_set() -> WorkingSet {
        let mut ws = WorkingSet::new(
            vec![person(1, "Alice Chen"), person(2, "Bob Tan")],
            vec![Department {
                id: 10,
                name: "Engineering".to_string(),
                total_users: 0,
                total_tasks: 0,
            }],
            vec![
                Assignment {
                    user: RecordRef {
                        id: 1,
                        display: "Alice Chen".to_string(),
                    },
                    department: RecordRef {
                        id: 10,
                        display: "Engineering".to_string(),
                    },
                },
                Assignment {
                    user: RecordRef {
                        id: 2,
                        display: "Bob Tan".to_string(),
                    },
                    department: RecordRef {
                        id: 10,
                        display: "Engineering".to_string(),
                    },
                },
            ],
            vec![],
        );
        aggregate::aggregate(&mut ws);
        ws
    }

    #[test]
    fn stale_working_set_is_discarded() {
        let mut state = State::default();
        let first = state.begin_load();
        let second = state.begin_load();
        assert!(second > first);

        state.install_working_set(loaded_working_set(), first);
        assert!(state.working_set().people.is_empty());
        assert!(state.is_loading());

        state.install_working_set(loaded_working_set(), second);
        assert_eq!(state.working_set().people.len(), 2);
        assert!(!state.is_loading());
    }

    #[test]
    fn load_failure_falls_back_to_empty_set() {
        let mut state = State::default();
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);

        let generation = state.begin_load();
        state.load_failed(generation, "Connection refused".to_string());
        assert!(state.working_set().people.is_empty());
        assert!(state.filtered_people().is_empty());
        assert_eq!(state.notice(), Some("Connection refused"));
    }

    #[test]
    fn filter_edits_reset_to_first_page() {
        let mut state = State::default();
        let mut ws = WorkingSet::new(
            (1..=25)
                .map(|i| person(i, &format!("Person {:02}", i)))
                .collect(),
            vec![],
            vec![],
            vec![],
        );
        aggregate::aggregate(&mut ws);
        let generation = state.begin_load();
        state.install_working_set(ws, generation);

        state.next_people_page();
        assert_eq!(state.people_pager().page, 2);
        state.add_search_char('p');
        assert_eq!(state.people_pager().page, 1);
    }

    #[test]
    fn chart_bar_selection_filters_people_view() {
        let mut state = State::default();
        state.set_role(Role::Board);
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);
        state.charts_mut().mark_rendered();

        state.select_chart_bar();
        assert_eq!(state.current_view(), View::People);
        assert_eq!(state.filters().search, "alice chen");
        assert_eq!(state.filtered_people().len(), 1);
    }

    #[test]
    fn chart_bar_selection_keeps_active_filters() {
        let mut state = State::default();
        state.set_role(Role::Board);
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);
        state.charts_mut().mark_rendered();

        state.cycle_department_filter();
        assert_eq!(state.filters().department, "Engineering");

        state.select_chart_bar();
        // The search predicate joins the department filter conjunctively
        assert_eq!(state.filters().department, "Engineering");
        assert_eq!(state.filters().search, "alice chen");
        assert_eq!(state.filtered_people().len(), 1);
    }

    #[test]
    fn filter_by_unknown_person_is_an_error() {
        let mut state = State::default();
        state.set_role(Role::Board);
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);

        let err = state.filter_by_person("Ghost Writer").unwrap_err();
        assert!(matches!(err, StateError::PersonNotFound { .. }));
        assert!(state.filters().search.is_empty());
        assert_eq!(state.current_view(), View::Dashboard);
    }

    #[test]
    fn leaving_dashboard_clears_charts() {
        let mut state = State::default();
        state.set_role(Role::Board);
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);
        assert!(!state.charts().is_empty());

        state.next_tab();
        assert_eq!(state.current_view(), View::People);
        assert!(state.charts().is_empty());
    }

    #[test]
    fn staff_role_cannot_activate_dashboard() {
        let mut state = State::default();
        state.set_role(Role::Staff);
        assert_eq!(state.current_view(), View::Reports);
        state.activate_tab(View::Dashboard);
        assert_eq!(state.current_view(), View::Reports);
    }

    #[test]
    fn cycle_filters_wrap_back_to_unfiltered() {
        let mut state = State::default();
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);

        state.cycle_department_filter();
        assert_eq!(state.filters().department, "Engineering");
        state.cycle_department_filter();
        assert!(state.filters().department.is_empty());

        state.cycle_status_filter();
        assert_eq!(state.filters().status, Some(Status::ALL[0]));
        for _ in 1..Status::ALL.len() {
            state.cycle_status_filter();
        }
        state.cycle_status_filter();
        assert_eq!(state.filters().status, None);
    }

    #[test]
    fn column_toggle_round_trips() {
        let mut state = State::default();
        assert!(state.column_visible("notes"));
        state.toggle_column("notes");
        assert!(!state.column_visible("notes"));
        assert!(!state.get_visible_columns().contains(&"notes".to_string()));
        state.toggle_column("notes");
        assert!(state.column_visible("notes"));
    }

    #[test]
    fn sort_cycle_starts_ascending_and_toggle_flips() {
        let mut state = State::default();
        let generation = state.begin_load();
        state.install_working_set(loaded_working_set(), generation);

        state.cycle_sort_field();
        let sort = state.people_sort().unwrap();
        assert_eq!(sort.field, SortField::ALL[0]);
        assert_eq!(sort.direction, SortDirection::Ascending);

        state.toggle_sort_direction();
        assert_eq!(
            state.people_sort().unwrap().direction,
            SortDirection::Descending
        );
    }

    #[test]
    fn scoped_refresh_requests_department_load() {
        let (tx, rx) = std::sync::mpsc::channel();
        let (config_tx, _config_rx) = std::sync::mpsc::channel();
        let mut state = State::new(tx, config_tx, crate::ui::Theme::default(), vec![]);

        state.set_department_scope(Some(42));
        state.request_refresh();
        match rx.try_recv().unwrap() {
            NetworkEvent::LoadDepartment { department_id, .. } => assert_eq!(department_id, 42),
            other => panic!("unexpected event: {:?}", other),
        }

        state.set_department_scope(None);
        state.request_refresh();
        assert!(matches!(rx.try_recv().unwrap(), NetworkEvent::LoadAll { .. }));
    }
}
