use super::Frame;
use crate::dashboard::{ChartSpec, DashboardPhase, TotalStats};
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph},
};

/// How many department charts fit on screen at once. The selection scrolls
/// the window over the full list.
const VISIBLE_CHARTS: usize = 3;

/// Render the dashboard: the status totals strip on top and one task bar
/// chart per department below it.
///
pub fn dashboard(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();

    match state.charts().phase() {
        DashboardPhase::Uninitialized | DashboardPhase::Loading => {
            let message = format!(
                "{} Loading dashboard data...",
                spinner::frame(state.get_spinner_index())
            );
            let paragraph = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(styling::muted_text_style(&theme))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(styling::normal_block_border_style(&theme))
                        .title(" Dashboard "),
                );
            frame.render_widget(paragraph, size);
            return;
        }
        DashboardPhase::Ready { .. } => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(size);

    totals(frame, chunks[0], state);
    charts(frame, chunks[1], state);

    // Charts have been drawn from installed data; the next render may reuse
    // them without waiting for another data signal.
    state.charts_mut().mark_rendered();
}

/// The status rollup across every loaded person.
///
fn totals(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let stats: TotalStats = state.totals();
    let spans = vec![
        Span::styled(
            format!(" Tasks {} ", stats.total_tasks),
            Style::default()
                .fg(theme.text_secondary.to_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· Completed {} ", stats.completed),
            Style::default().fg(theme.success.to_color()),
        ),
        Span::styled(
            format!("· In progress {} ", stats.in_progress),
            Style::default().fg(theme.info.to_color()),
        ),
        Span::styled(
            format!("· Not started {} ", stats.not_started),
            Style::default().fg(theme.text_muted.to_color()),
        ),
        Span::styled(
            format!("· Delayed {} ", stats.delayed),
            Style::default().fg(theme.warning.to_color()),
        ),
        Span::styled(
            format!("· Plan {} ", stats.plan),
            Style::default().fg(theme.secondary.to_color()),
        ),
        Span::styled(
            format!("· Overdue {} ", stats.overdue),
            Style::default().fg(theme.error.to_color()),
        ),
    ];
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::normal_block_border_style(theme))
            .title(" Totals "),
    );
    frame.render_widget(paragraph, size);
}

/// One bar chart per department, windowed around the selected chart.
///
fn charts(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let specs = state.charts().specs();
    if specs.is_empty() {
        let paragraph = Paragraph::new("No report data to chart.")
            .alignment(Alignment::Center)
            .style(styling::muted_text_style(theme))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styling::normal_block_border_style(theme))
                    .title(" Departments "),
            );
        frame.render_widget(paragraph, size);
        return;
    }

    let (selected_chart, selected_bar) = state.charts().selection();
    let visible = specs.len().min(VISIBLE_CHARTS);
    let first = selected_chart.saturating_sub(visible - 1);

    let constraints: Vec<Constraint> = (0..visible)
        .map(|_| Constraint::Ratio(1, visible as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    for (slot, index) in (first..first + visible).enumerate() {
        let spec = &specs[index];
        let active = index == selected_chart;
        let bar = if active { Some(selected_bar) } else { None };
        chart(frame, chunks[slot], state, spec, active, bar);
    }
}

fn chart(
    frame: &mut Frame,
    size: Rect,
    state: &State,
    spec: &ChartSpec,
    active: bool,
    selected_bar: Option<usize>,
) {
    let theme = state.get_theme();
    let title = match selected_bar.and_then(|i| spec.bars.get(i)) {
        Some((name, count)) => format!(" {} · {}: {} ", spec.title, name, count),
        None => format!(" {} ", spec.title),
    };
    let border_style = if active {
        styling::active_block_border_style(theme)
    } else {
        styling::normal_block_border_style(theme)
    };
    let bar_color = if active {
        theme.accent.to_color()
    } else {
        theme.primary.to_color()
    };

    let data: Vec<(&str, u64)> = spec
        .bars
        .iter()
        .map(|(label, value)| (label.as_str(), *value))
        .collect();
    let bar_chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(title, styling::active_block_title_style())),
        )
        .data(&data)
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(bar_color))
        .value_style(
            Style::default()
                .fg(theme.background.to_color())
                .bg(bar_color),
        )
        .label_style(styling::muted_text_style(theme));
    frame.render_widget(bar_chart, size);
}
