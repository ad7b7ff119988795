use super::Frame;
use crate::dashboard::SortDirection;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

/// Render the people view: the active query line on top and the paginated
/// person summary table below it.
///
pub fn people(frame: &mut Frame, size: Rect, state: &mut State) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(size);

    query_line(frame, chunks[0], state);
    table(frame, chunks[1], state);
}

/// The active search text, filters, and sort state.
///
fn query_line(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let filters = state.filters();

    let mut spans = vec![Span::styled(
        " search: ",
        styling::muted_text_style(theme),
    )];
    let search_style = if state.is_search_mode() {
        Style::default()
            .fg(theme.footer_search.to_color())
            .add_modifier(Modifier::BOLD)
    } else {
        styling::normal_text_style(theme)
    };
    let search_text = if state.is_search_mode() {
        format!("{}_", filters.search)
    } else {
        filters.search.clone()
    };
    spans.push(Span::styled(search_text, search_style));

    let mut label = |name: &str, value: String| {
        spans.push(Span::styled(
            format!("  {}: ", name),
            styling::muted_text_style(theme),
        ));
        spans.push(Span::styled(value, styling::normal_text_style(theme)));
    };
    label(
        "dept",
        filled_or_any(&filters.department),
    );
    label("role", filled_or_any(&filters.role));
    label(
        "status",
        filters
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "any".to_string()),
    );
    label(
        "sort",
        match state.people_sort() {
            Some(sort) => format!("{} {}", sort.field.label(), direction_arrow(sort.direction)),
            None => "none".to_string(),
        },
    );

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title(" Query "),
    );
    frame.render_widget(paragraph, size);
}

fn table(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let pager = state.people_pager();
    let total_rows = state.filtered_people().len();
    let total_pages = pager.total_pages(total_rows);
    let title = format!(
        " People · {} rows · page {}/{} ",
        total_rows,
        pager.page,
        total_pages.max(1)
    );

    let header = Row::new(vec![
        "Person",
        "Department",
        "Position",
        "Total",
        "Done",
        "Doing",
        "Todo",
        "Late",
        "Plan",
        "Over",
    ])
    .style(
        Style::default()
            .fg(theme.text_secondary.to_color())
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .visible_people()
        .iter()
        .map(|person| {
            Row::new(vec![
                Cell::from(person.user.display.clone())
                    .style(styling::normal_text_style(&theme)),
                Cell::from(person.department_name.clone())
                    .style(styling::normal_text_style(&theme)),
                Cell::from(person.position.clone()).style(styling::muted_text_style(&theme)),
                Cell::from(person.total_tasks.to_string())
                    .style(styling::normal_text_style(&theme)),
                Cell::from(person.completed.to_string())
                    .style(Style::default().fg(theme.success.to_color())),
                Cell::from(person.in_progress.to_string())
                    .style(Style::default().fg(theme.info.to_color())),
                Cell::from(person.not_started.to_string())
                    .style(Style::default().fg(theme.text_muted.to_color())),
                Cell::from(person.delayed.to_string())
                    .style(Style::default().fg(theme.warning.to_color())),
                Cell::from(person.plan.to_string())
                    .style(Style::default().fg(theme.secondary.to_color())),
                Cell::from(person.overdue.to_string())
                    .style(Style::default().fg(theme.error.to_color())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Min(16),
        Constraint::Min(14),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(&theme))
                .title(Span::styled(title, styling::active_block_title_style())),
        )
        .highlight_style(styling::highlight_style(&theme))
        .highlight_symbol("» ");

    let mut table_state =
        TableState::default().with_selected(state.get_people_list_state().selected());
    frame.render_stateful_widget(table, size, &mut table_state);
}

fn filled_or_any(value: &str) -> String {
    if value.is_empty() {
        "any".to_string()
    } else {
        value.to_string()
    }
}

fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "↑",
        SortDirection::Descending => "↓",
    }
}
