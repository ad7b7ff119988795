use super::Frame;
use crate::state::{State, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the footer: the input mode badge, the latest notice or the key
/// hints for the active view, and the version on the right.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let (mode, mode_color) = if state.is_search_mode() {
        ("SEARCH", theme.footer_search.to_color())
    } else if state.is_debug_mode() {
        ("DEBUG", theme.footer_debug.to_color())
    } else {
        ("NORMAL", theme.footer_normal.to_color())
    };
    let badge = format!(" {} ", mode);
    let version = format!(" v{} ", env!("CARGO_PKG_VERSION"));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(badge.len() as u16),
            Constraint::Min(10),
            Constraint::Length(version.len() as u16),
        ])
        .split(size);

    let badge_widget = Paragraph::new(Span::styled(
        badge,
        Style::default()
            .fg(theme.background.to_color())
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(badge_widget, chunks[0]);

    let middle = match state.notice() {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice),
            Style::default().fg(theme.warning.to_color()),
        )),
        None => Line::from(Span::styled(
            format!(" {}", hints(state)),
            Style::default().fg(theme.text_muted.to_color()),
        )),
    };
    frame.render_widget(Paragraph::new(middle), chunks[1]);

    let version_widget = Paragraph::new(Span::styled(
        version,
        Style::default()
            .fg(theme.text_muted.to_color())
            .bg(theme.surface.to_color()),
    ))
    .alignment(Alignment::Right);
    frame.render_widget(version_widget, chunks[2]);
}

fn hints(state: &State) -> &'static str {
    if state.is_search_mode() {
        return "type to search, Backspace: erase, Enter/Esc: done";
    }
    match state.current_view() {
        View::Dashboard => "h/l: bar  j/k: chart  Enter: inspect person  Tab: views  r: reload  q: quit",
        View::People => "/: search  f/o/t: filters  c: clear  s/S/x: sort  j/k: row  h/l: page  q: quit",
        View::Departments => "j/k: select  Enter: open  Tab: views  r: reload  q: quit",
        View::DepartmentDetail => "h/l: page  s/x: sort  1-8: columns  Esc: back  q: quit",
        View::Reports => "h/l: page  s/x: sort  1-8: columns  r: reload  R: recompute  q: quit",
    }
}
