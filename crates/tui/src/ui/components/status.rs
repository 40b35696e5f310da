use ratatui::{style::Style, text::Span};

use api_types::todo::TodoStatus;

use crate::ui::theme::Theme;

/// Badge color per status. `Unknown` gets the dim fallback so values a
/// newer server introduces still render.
pub fn status_style(status: TodoStatus, theme: &Theme) -> Style {
    let color = match status {
        TodoStatus::Created => theme.accent,
        TodoStatus::OnGoing => theme.warn,
        TodoStatus::Completed => theme.positive,
        TodoStatus::Problem => theme.error,
        TodoStatus::Unknown => theme.dim,
    };
    Style::default().fg(color)
}

pub fn status_span(status: TodoStatus, theme: &Theme) -> Span<'static> {
    Span::styled(format!("{:<10}", status.label()), status_style(status, theme))
}
