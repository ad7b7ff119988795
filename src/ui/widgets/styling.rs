use crate::backend::Status;
use crate::ui::theme::Theme;
use ratatui::style::{Modifier, Style};

/// Return the border style for active blocks.
///
pub fn active_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_active.to_color())
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style(theme: &Theme) -> Style {
    Style::default().fg(theme.border_normal.to_color())
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for the row under the cursor.
///
pub fn highlight_style(theme: &Theme) -> Style {
    Style::default()
        .bg(theme.highlight_bg.to_color())
        .fg(theme.highlight_fg.to_color())
}

/// Return the style for normal text.
///
pub fn normal_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text.to_color())
}

/// Return the style for secondary text such as page counters.
///
pub fn muted_text_style(theme: &Theme) -> Style {
    Style::default().fg(theme.text_muted.to_color())
}

/// Return the style for a report status cell.
///
pub fn status_style(theme: &Theme, status: Status) -> Style {
    let color = match status {
        Status::Completed => &theme.success,
        Status::InProgress => &theme.info,
        Status::NotStarted => &theme.text_muted,
        Status::Delayed => &theme.warning,
        Status::Plan => &theme.secondary,
        Status::Overdue => &theme.error,
    };
    Style::default().fg(color.to_color())
}
