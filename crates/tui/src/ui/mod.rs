pub mod components;
pub mod keymap;
pub mod screens;
pub mod timefmt;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, InputMode, Overlay};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Todo table
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    screens::todos::render(frame, layout[1], state, &theme);
    render_bottom_bar(frame, layout[2], state, &theme);

    components::detail_overlay::render(frame, area, state);
    components::status_picker::render(frame, area, state);
    components::help_overlay::render(frame, area, state);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let count = state.store.collection().map(|todos| todos.len()).unwrap_or(0);

    let mut line = vec![
        Span::styled("Server", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Todos", Style::default().fg(theme.dim)),
        Span::raw(format!(": {count}  ")),
    ];

    if state.store.is_loading() {
        line.push(Span::styled("refreshing…", Style::default().fg(theme.dim)));
    } else if state.todos.update_pending {
        line.push(Span::styled("saving…", Style::default().fg(theme.dim)));
    } else if state.todos.add_pending {
        line.push(Span::styled("adding…", Style::default().fg(theme.dim)));
    }

    // A refresh failure with data still cached: show it here, keep the
    // stale table visible.
    if state.store.collection().is_some() {
        if let Some(err) = &state.todos.load_error {
            line.push(Span::styled(
                err.as_str(),
                Style::default().fg(theme.error),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints: &[(&str, &str)] = if state.overlay == Overlay::StatusPick {
        &[("↑/↓", "choose"), ("Enter", "apply"), ("Esc", "cancel")]
    } else if state.overlay != Overlay::None {
        &[("Esc", "close"), ("q", "quit")]
    } else {
        match state.input {
            InputMode::Search | InputMode::Add => &[("Enter", "apply"), ("Esc", "cancel")],
            InputMode::Normal => &[
                ("/", "filter"),
                ("a", "add"),
                ("s", "status"),
                ("Enter", "detail"),
                ("r", "refresh"),
                ("?", "help"),
                ("q", "quit"),
            ],
        }
    };

    let mut parts = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            parts.push(Span::raw("  "));
        }
        parts.push(Span::styled(*key, Style::default().fg(theme.accent)));
        parts.push(Span::raw(format!(" {action}")));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
