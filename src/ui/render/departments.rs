use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the departments view: every department with its member and task
/// rollups. Enter opens the detail view with the department's reports.
///
pub fn departments(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let departments = state.working_set().departments.clone();
    let title = format!(" Departments · {} ", departments.len());

    let items: Vec<ListItem> = departments
        .iter()
        .map(|department| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<28}", department.name),
                    styling::normal_text_style(&theme),
                ),
                Span::styled(
                    format!(
                        "{} members · {} tasks",
                        department.total_users, department.total_tasks
                    ),
                    styling::muted_text_style(&theme),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(&theme))
                .title(Span::styled(title, styling::active_block_title_style())),
        )
        .highlight_style(styling::highlight_style(&theme))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, size, state.get_departments_list_state());
}
