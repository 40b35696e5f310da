use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, Overlay},
    ui::{components::centered_rect, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if state.overlay != Overlay::Help {
        return;
    }

    let theme = Theme::default();
    let popup = centered_rect(50, 60, area);
    frame.render_widget(Clear, popup);

    let hint = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(key, Style::default().fg(theme.accent)),
            Span::raw(format!("  {action}")),
        ])
    };

    let lines = vec![
        hint("↑/↓, j/k", "select row"),
        hint("Enter", "open detail"),
        hint("s", "change status"),
        hint("a", "add a todo"),
        hint("/", "filter by title"),
        hint("r", "refresh from server"),
        hint("Esc", "close / cancel"),
        hint("q, Ctrl+C", "quit"),
    ];

    let block = Block::default()
        .title(" keybinds ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
