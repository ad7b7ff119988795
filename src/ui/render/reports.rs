use super::Frame;
use crate::backend::ReportRecord;
use crate::dashboard::SortDirection;
use crate::state::{State, REPORT_COLUMNS};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

/// Render the reports view over the full working set.
///
pub fn reports(frame: &mut Frame, size: Rect, state: &mut State) {
    report_table(frame, size, state, " Reports");
}

/// Render the department detail view: the department header on top and its
/// weekly reports, including the department's dynamic columns, below.
///
pub fn department_detail(frame: &mut Frame, size: Rect, state: &mut State) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(size);

    detail_header(frame, chunks[0], state);
    report_table(frame, chunks[1], state, " Department reports");
}

fn detail_header(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let line = match state.detail_department() {
        Some(department) => {
            let mut spans = vec![
                Span::styled(
                    format!(" {} ", department.name),
                    Style::default()
                        .fg(theme.text_secondary.to_color())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "· {} members · {} tasks",
                        department.total_users, department.total_tasks
                    ),
                    styling::muted_text_style(theme),
                ),
            ];
            if !state.detail_columns().is_empty() {
                let names: Vec<&str> = state
                    .detail_columns()
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect();
                spans.push(Span::styled(
                    format!(" · extra columns: {}", names.join(", ")),
                    styling::muted_text_style(theme),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            " No department selected.",
            styling::muted_text_style(theme),
        )),
    };
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title(" Detail "),
    );
    frame.render_widget(paragraph, size);
}

fn report_table(frame: &mut Frame, size: Rect, state: &mut State, title_prefix: &str) {
    let theme = state.get_theme().clone();
    let pager = state.report_pager();
    let total_rows = state.report_rows().len();
    let total_pages = pager.total_pages(total_rows);

    if total_rows == 0 {
        let message = if state.is_loading() {
            format!(
                "{} Loading reports...",
                spinner::frame(state.get_spinner_index())
            )
        } else {
            "No reports loaded.".to_string()
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(styling::muted_text_style(&theme))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styling::normal_block_border_style(&theme))
                    .title(format!("{} ", title_prefix)),
            );
        frame.render_widget(paragraph, size);
        return;
    }

    let sort_label = match state.report_sort() {
        Some((field, direction)) => {
            format!(" · sort {} {}", field.label(), direction_arrow(direction))
        }
        None => String::new(),
    };
    let title = format!(
        "{} · {} rows · page {}/{}{} ",
        title_prefix,
        total_rows,
        pager.page,
        total_pages.max(1),
        sort_label
    );

    let columns = visible_columns(state);
    let header = Row::new(
        columns
            .iter()
            .map(|(_, label)| Cell::from(label.clone()))
            .collect::<Vec<Cell>>(),
    )
    .style(
        Style::default()
            .fg(theme.text_secondary.to_color())
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .visible_reports()
        .iter()
        .map(|report| {
            Row::new(
                columns
                    .iter()
                    .map(|(key, _)| cell(report, key, &theme))
                    .collect::<Vec<Cell>>(),
            )
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(|(key, _)| width(key)).collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::active_block_border_style(&theme))
                .title(Span::styled(title, styling::active_block_title_style())),
        )
        .style(styling::normal_text_style(&theme));
    frame.render_widget(table, size);
}

/// The enabled base columns followed by the loaded dynamic columns. Keys are
/// field keys; labels are header captions.
///
fn visible_columns(state: &State) -> Vec<(String, String)> {
    let mut columns: Vec<(String, String)> = REPORT_COLUMNS
        .iter()
        .filter(|key| state.column_visible(key))
        .map(|key| (key.to_string(), base_label(key).to_string()))
        .collect();
    for template in state.detail_columns() {
        columns.push((template.field_key.clone(), template.name.clone()));
    }
    columns
}

fn base_label(key: &str) -> &'static str {
    match key {
        "name" => "Task",
        "pic" => "PIC",
        "client" => "Client",
        "project_task" => "Project",
        "deadline" => "Deadline",
        "status" => "Status",
        "progress" => "Progress",
        _ => "Notes",
    }
}

fn width(key: &str) -> Constraint {
    match key {
        "deadline" => Constraint::Length(10),
        "status" => Constraint::Length(11),
        "progress" => Constraint::Length(8),
        "name" | "notes" => Constraint::Min(18),
        _ => Constraint::Min(12),
    }
}

fn cell<'a>(report: &'a ReportRecord, key: &str, theme: &crate::ui::Theme) -> Cell<'a> {
    match key {
        "name" => Cell::from(report.name.clone()),
        "pic" => Cell::from(report.pic.display.clone()),
        "client" => Cell::from(report.client_display().to_string()),
        "project_task" => Cell::from(report.project_task.clone()),
        "deadline" => Cell::from(
            report
                .deadline
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ),
        "status" => Cell::from(report.status.as_str())
            .style(styling::status_style(theme, report.status)),
        "progress" => Cell::from(format!("{:>4.0}%", report.display_progress())),
        "notes" => Cell::from(report.notes_text.clone()),
        dynamic_key => {
            let value = report
                .dynamic
                .iter()
                .find(|(k, _)| k == dynamic_key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            Cell::from(value)
        }
    }
}

fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "↑",
        SortDirection::Descending => "↓",
    }
}
