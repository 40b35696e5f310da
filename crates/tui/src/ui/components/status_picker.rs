use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

use api_types::todo::TodoStatus;

use crate::{
    app::{AppState, Overlay},
    ui::{
        components::{centered_box, status::status_style},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    if state.overlay != Overlay::StatusPick {
        return;
    }

    let theme = Theme::default();
    let height = TodoStatus::ALL.len() as u16 + 2;
    let popup = centered_box(24, height, area);
    frame.render_widget(Clear, popup);

    let items = TodoStatus::ALL
        .iter()
        .map(|status| {
            ListItem::new(Line::styled(status.label(), status_style(*status, &theme)))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.todos.status_cursor));

    let list = List::new(items)
        .block(
            Block::default()
                .title(" set status ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.accent)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, popup, &mut list_state);
}
