use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::todo::TodoView;

use crate::{
    app::{AppState, InputMode},
    ui::{components::status::status_span, theme::Theme, timefmt},
};

const TITLE_WIDTH: usize = 36;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter + add inputs
            Constraint::Length(1), // Add error line
            Constraint::Min(0),    // Table
        ])
        .split(area);

    render_inputs(frame, layout[0], state, theme);
    render_add_error(frame, layout[1], state, theme);
    render_table(frame, layout[2], state, theme);
}

fn render_inputs(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_input_box(
        frame,
        columns[0],
        " filter ",
        &state.todos.filter,
        state.input == InputMode::Search,
        theme,
        theme.border,
    );

    let add_title = if state.todos.add_pending {
        " new todo (saving…) "
    } else {
        " new todo "
    };
    let add_border = if state.todos.add_error.is_some() {
        theme.error
    } else {
        theme.border
    };
    render_input_box(
        frame,
        columns[1],
        add_title,
        &state.todos.add_input,
        state.input == InputMode::Add,
        theme,
        add_border,
    );
}

fn render_input_box(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
    border: ratatui::style::Color,
) {
    let border_color = if focused { theme.accent } else { border };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let cursor = if focused { "│" } else { "" };
    let style = if focused {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.dim)
    };
    let content = Paragraph::new(Line::from(format!("{value}{cursor}")))
        .style(style)
        .block(block);
    frame.render_widget(content, area);
}

fn render_add_error(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(err) = &state.todos.add_error else {
        return;
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            err.as_str(),
            Style::default().fg(theme.error),
        )),
        area,
    );
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default().title(" todos ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.store.collection().is_none() {
        // Nothing cached yet: initial load outstanding or failed outright.
        let message = if state.store.is_loading() {
            Span::styled("Loading todos…", Style::default().fg(theme.dim))
        } else if let Some(err) = &state.todos.load_error {
            Span::styled(err.as_str(), Style::default().fg(theme.error))
        } else {
            Span::styled("No data.", Style::default().fg(theme.dim))
        };
        frame.render_widget(
            Paragraph::new(Line::from(message)).alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let visible = state.visible();
    if visible.is_empty() {
        let message = if state.todos.filter.is_empty() {
            "No todos yet. Press a to add one."
        } else {
            "No todos match."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(theme.dim),
            )))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let header = format!(
        "  {:>4}  {:<width$}  {:<10}  Created",
        "ID",
        "Title",
        "Status",
        width = TITLE_WIDTH
    );
    frame.render_widget(
        Paragraph::new(Line::styled(header, Style::default().fg(theme.dim))),
        rows[0],
    );

    let items = visible
        .iter()
        .map(|todo| row(todo, state, theme))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.todos.selected));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, rows[1], &mut list_state);
}

fn row(todo: &TodoView, state: &AppState, theme: &Theme) -> ListItem<'static> {
    let line = Line::from(vec![
        Span::raw(format!("{:>4}  ", todo.id)),
        Span::raw(format!(
            "{:<width$}  ",
            truncate(&todo.title, TITLE_WIDTH),
            width = TITLE_WIDTH
        )),
        status_span(todo.status, theme),
        Span::styled(
            format!("  {}", timefmt::short(&todo.created_at, state.tz)),
            Style::default().fg(theme.dim),
        ),
    ]);
    ListItem::new(line)
}

fn truncate(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_titles_intact() {
        assert_eq!(truncate("buy milk", 36), "buy milk");
    }

    #[test]
    fn truncate_marks_long_titles() {
        let long = "a".repeat(50);
        let cut = truncate(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
