use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, Overlay},
    ui::{
        components::{centered_box, status::status_span},
        theme::Theme,
        timefmt,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if state.overlay != Overlay::Detail {
        return;
    }
    let Some(todo) = state.todos.detail_id.and_then(|id| state.store.get(id)) else {
        return;
    };

    let theme = Theme::default();
    let popup = centered_box(56, 9, area);
    frame.render_widget(Clear, popup);

    let problem = todo.problem_desc.as_deref().unwrap_or("-");
    let lines = vec![
        Line::from(vec![
            Span::styled("Title", Style::default().fg(theme.dim)),
            Span::raw(format!(": {}", todo.title)),
        ]),
        Line::from(vec![
            Span::styled("Status", Style::default().fg(theme.dim)),
            Span::raw(": "),
            status_span(todo.status, &theme),
        ]),
        Line::from(vec![
            Span::styled("Problem", Style::default().fg(theme.dim)),
            Span::raw(format!(": {problem}")),
        ]),
        Line::from(vec![
            Span::styled("Created", Style::default().fg(theme.dim)),
            Span::raw(format!(": {}", timefmt::long(&todo.created_at, state.tz))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" close"),
        ]),
    ];

    let block = Block::default()
        .title(" todo ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
