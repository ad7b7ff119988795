use super::{dashboard, departments, people, reports, Frame};
use crate::state::{State, View};
use ratatui::layout::Rect;

/// Render main widget according to state.
///
pub fn main(frame: &mut Frame, size: Rect, state: &mut State) {
    match state.current_view() {
        View::Dashboard => {
            dashboard::dashboard(frame, size, state);
        }
        View::People => {
            people::people(frame, size, state);
        }
        View::Departments => {
            departments::departments(frame, size, state);
        }
        View::DepartmentDetail => {
            reports::department_detail(frame, size, state);
        }
        View::Reports => {
            reports::reports(frame, size, state);
        }
    }
}
