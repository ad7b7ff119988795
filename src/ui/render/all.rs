use super::{footer, header, log, main, Frame};
use crate::state::State;
use ratatui::layout::{Constraint, Direction, Layout};

/// Render the whole screen: header tabs, the active view, the log pane when
/// debug mode is on, and the footer.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();
    let constraints = if state.is_debug_mode() {
        vec![
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(1),
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
        ]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    header(frame, chunks[0], state);
    main(frame, chunks[1], state);
    if state.is_debug_mode() {
        log(frame, chunks[2], state);
        footer(frame, chunks[3], state);
    } else {
        footer(frame, chunks[2], state);
    }
}
