use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
};

/// Render the tab bar. Only the views visible to the caller's role appear;
/// the title carries the spinner while a load is in flight.
///
pub fn header(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let title = if state.is_loading() {
        format!(
            " picboard · {:?} {} ",
            state.get_role(),
            spinner::frame(state.get_spinner_index())
        )
    } else {
        format!(" picboard · {:?} ", state.get_role())
    };

    let titles: Vec<Line> = state
        .tabs()
        .iter()
        .map(|view| Line::from(view.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.tab_index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(&theme))
                .title(title),
        )
        .style(styling::normal_text_style(&theme))
        .highlight_style(
            Style::default()
                .fg(theme.primary.to_color())
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, size);
}
