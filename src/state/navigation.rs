//! Navigation-related state types.
//!
//! Views are presented as tabs; which tabs exist is a pure function of the
//! caller's role. The department detail view is never a tab, it is pushed on
//! top of the departments view.

use crate::backend::Role;

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Dashboard,
    People,
    Departments,
    DepartmentDetail,
    Reports,
}

impl View {
    /// Tab title for the view.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::People => "People",
            View::Departments => "Departments",
            View::DepartmentDetail => "Department",
            View::Reports => "Reports",
        }
    }
}

/// Returns the tabs visible to the given role. Staff callers only see their
/// own reports; supervisors lose the department administration tab.
///
pub fn visible_views(role: Role) -> &'static [View] {
    match role {
        Role::Board | Role::Manager => &[
            View::Dashboard,
            View::People,
            View::Departments,
            View::Reports,
        ],
        Role::Supervisor => &[View::Dashboard, View::People, View::Reports],
        Role::Staff => &[View::Reports],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_and_manager_see_all_tabs() {
        assert_eq!(visible_views(Role::Board).len(), 4);
        assert_eq!(visible_views(Role::Board), visible_views(Role::Manager));
    }

    #[test]
    fn supervisor_loses_departments_tab() {
        let views = visible_views(Role::Supervisor);
        assert!(!views.contains(&View::Departments));
        assert!(views.contains(&View::Dashboard));
    }

    #[test]
    fn staff_only_sees_reports() {
        assert_eq!(visible_views(Role::Staff), &[View::Reports]);
    }

    #[test]
    fn detail_view_is_never_a_tab() {
        for role in [Role::Board, Role::Manager, Role::Supervisor, Role::Staff] {
            assert!(!visible_views(role).contains(&View::DepartmentDetail));
        }
    }
}
