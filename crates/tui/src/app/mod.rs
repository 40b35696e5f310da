use std::time::Duration;

use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;

use api_types::todo::{TodoStatus, TodoView};
use client::{ApiError, LoadTicket, StoreError, TodoApi, TodoStore, UpdateTicket};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui,
};

/// Which overlay (if any) sits on top of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Detail,
    StatusPick,
    Help,
}

/// What the keyboard currently edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Add,
}

#[derive(Debug)]
pub struct TodosState {
    pub filter: String,
    pub selected: usize,
    pub add_input: String,
    pub add_error: Option<String>,
    pub add_pending: bool,
    /// One flag for all rows; overlapping updates are not isolated per id.
    pub update_pending: bool,
    pub load_error: Option<String>,
    pub detail_id: Option<i64>,
    pub status_cursor: usize,
}

impl Default for TodosState {
    fn default() -> Self {
        Self {
            filter: String::new(),
            selected: 0,
            add_input: String::new(),
            add_error: None,
            add_pending: false,
            update_pending: false,
            load_error: None,
            detail_id: None,
            status_cursor: 0,
        }
    }
}

pub struct AppState {
    pub todos: TodosState,
    pub overlay: Overlay,
    pub input: InputMode,
    pub store: TodoStore,
    pub base_url: String,
    pub tz: Tz,
}

impl AppState {
    /// The rows the table shows: the cached collection narrowed by the
    /// title filter. Recomputed on every render, never cached.
    pub fn visible(&self) -> Vec<&TodoView> {
        match self.store.collection() {
            Some(todos) => filter_todos(todos, &self.todos.filter),
            None => Vec::new(),
        }
    }
}

/// Case-insensitive substring match on titles.
pub fn filter_todos<'a>(todos: &'a [TodoView], query: &str) -> Vec<&'a TodoView> {
    if query.is_empty() {
        return todos.iter().collect();
    }
    let needle = query.to_lowercase();
    todos
        .iter()
        .filter(|todo| todo.title.to_lowercase().contains(&needle))
        .collect()
}

/// Completion of a network round-trip, delivered back to the event loop.
enum NetEvent {
    Loaded(LoadTicket, std::result::Result<Vec<TodoView>, ApiError>),
    Created(std::result::Result<TodoView, ApiError>),
    Updated(UpdateTicket, std::result::Result<TodoView, ApiError>),
}

pub struct App {
    api: TodoApi,
    pub state: AppState,
    events: mpsc::UnboundedReceiver<NetEvent>,
    events_tx: mpsc::UnboundedSender<NetEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = TodoApi::new(&config.base_url)?;
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("unknown timezone: {}", config.timezone)))?;
        let (events_tx, events) = mpsc::unbounded_channel();

        let state = AppState {
            todos: TodosState::default(),
            overlay: Overlay::None,
            input: InputMode::Normal,
            store: TodoStore::new(),
            base_url: config.base_url,
            tz,
        };

        Ok(Self {
            api,
            state,
            events,
            events_tx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        self.dispatch_load();

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }

            while let Ok(net) = self.events.try_recv() {
                self.apply(net);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match ui::keymap::map_key(key) {
            ui::keymap::AppAction::Quit => self.should_quit = true,
            ui::keymap::AppAction::Cancel => self.cancel(),
            ui::keymap::AppAction::Submit => self.submit(),
            ui::keymap::AppAction::Backspace => self.backspace(),
            ui::keymap::AppAction::Up => self.move_up(),
            ui::keymap::AppAction::Down => self.move_down(),
            ui::keymap::AppAction::Input(ch) => self.input(ch),
            ui::keymap::AppAction::None => {}
        }
    }

    fn cancel(&mut self) {
        if self.state.overlay != Overlay::None {
            self.state.overlay = Overlay::None;
            return;
        }
        match self.state.input {
            InputMode::Search => {
                self.state.todos.filter.clear();
                self.state.input = InputMode::Normal;
                self.clamp_selection();
            }
            InputMode::Add => {
                self.state.input = InputMode::Normal;
            }
            InputMode::Normal => {}
        }
    }

    fn submit(&mut self) {
        match self.state.overlay {
            Overlay::StatusPick => {
                let status = TodoStatus::ALL[self.state.todos.status_cursor];
                self.state.overlay = Overlay::None;
                self.submit_status(status);
                return;
            }
            Overlay::Detail | Overlay::Help => {
                self.state.overlay = Overlay::None;
                return;
            }
            Overlay::None => {}
        }
        match self.state.input {
            InputMode::Add => self.submit_add(),
            InputMode::Search => self.state.input = InputMode::Normal,
            InputMode::Normal => self.open_detail(),
        }
    }

    fn backspace(&mut self) {
        match self.state.input {
            InputMode::Search => {
                self.state.todos.filter.pop();
                self.clamp_selection();
            }
            InputMode::Add => {
                self.state.todos.add_input.pop();
            }
            InputMode::Normal => {}
        }
    }

    fn move_up(&mut self) {
        if self.state.overlay == Overlay::StatusPick {
            self.state.todos.status_cursor = self.state.todos.status_cursor.saturating_sub(1);
            return;
        }
        self.state.todos.selected = self.state.todos.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.state.overlay == Overlay::StatusPick {
            let last = TodoStatus::ALL.len() - 1;
            self.state.todos.status_cursor = (self.state.todos.status_cursor + 1).min(last);
            return;
        }
        let len = self.state.visible().len();
        if len == 0 {
            return;
        }
        self.state.todos.selected = (self.state.todos.selected + 1).min(len - 1);
    }

    fn input(&mut self, ch: char) {
        match self.state.input {
            InputMode::Search => {
                self.state.todos.filter.push(ch);
                self.clamp_selection();
            }
            InputMode::Add => self.state.todos.add_input.push(ch),
            InputMode::Normal => self.normal_key(ch),
        }
    }

    fn normal_key(&mut self, ch: char) {
        if self.state.overlay == Overlay::StatusPick {
            return;
        }
        match ch {
            'q' => self.should_quit = true,
            '?' => {
                self.state.overlay = if self.state.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
            }
            _ if self.state.overlay != Overlay::None => {}
            '/' => self.state.input = InputMode::Search,
            'a' => self.state.input = InputMode::Add,
            'r' => self.dispatch_load(),
            's' => self.open_status_picker(),
            'j' => self.move_down(),
            'k' => self.move_up(),
            _ => {}
        }
    }

    fn open_detail(&mut self) {
        if let Some(id) = self.selected_id() {
            self.state.todos.detail_id = Some(id);
            self.state.overlay = Overlay::Detail;
        }
    }

    fn open_status_picker(&mut self) {
        if self.state.todos.update_pending {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let current = self.state.store.get(id).map(|todo| todo.status);
        self.state.todos.status_cursor = TodoStatus::ALL
            .iter()
            .position(|status| Some(*status) == current)
            .unwrap_or(0);
        self.state.overlay = Overlay::StatusPick;
    }

    fn submit_add(&mut self) {
        if self.state.todos.add_pending {
            return;
        }
        let title = self.state.todos.add_input.trim().to_string();
        if title.is_empty() {
            self.state.todos.add_error = Some("Title must not be empty.".to_string());
            return;
        }

        // The input clears on submission, not on confirmed success.
        self.state.todos.add_input.clear();
        self.state.todos.add_error = None;
        self.state.todos.add_pending = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(NetEvent::Created(api.create(&title).await));
        });
    }

    fn submit_status(&mut self, status: TodoStatus) {
        if self.state.todos.update_pending {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(ticket) = self.state.store.begin_update(id, status) else {
            return;
        };
        self.state.todos.update_pending = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(NetEvent::Updated(ticket, api.update_status(id, status).await));
        });
    }

    fn dispatch_load(&mut self) {
        let Some(ticket) = self.state.store.begin_load() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(NetEvent::Loaded(ticket, api.list().await));
        });
    }

    fn apply(&mut self, net: NetEvent) {
        match net {
            NetEvent::Loaded(ticket, Ok(todos)) => {
                if self.state.store.complete_load(ticket, todos) {
                    self.state.todos.load_error = None;
                    self.clamp_selection();
                }
            }
            NetEvent::Loaded(ticket, Err(err)) => {
                if self.state.store.fail_load(ticket) {
                    self.state.todos.load_error = Some(StoreError::Fetch(err).to_string());
                }
            }
            NetEvent::Created(Ok(todo)) => {
                self.state.store.insert(todo);
                self.state.todos.add_pending = false;
            }
            NetEvent::Created(Err(err)) => {
                self.state.todos.add_pending = false;
                self.state.todos.add_error = Some(StoreError::Mutation(err).to_string());
            }
            NetEvent::Updated(ticket, result) => {
                match result {
                    Ok(_) => self.state.store.complete_update(ticket),
                    Err(err) => {
                        // Silent for the user: the badge reverting is the
                        // visible signal, reconciliation does the rest.
                        tracing::warn!(id = ticket.id(), "status update failed: {err}");
                        self.state.store.fail_update(ticket);
                    }
                }
                self.state.todos.update_pending = false;
                if self.state.store.is_stale() {
                    self.dispatch_load();
                }
            }
        }
    }

    fn selected_id(&self) -> Option<i64> {
        self.state
            .visible()
            .get(self.state.todos.selected)
            .map(|todo| todo.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.state.visible().len();
        self.state.todos.selected = self.state.todos.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn todo(id: i64, title: &str, status: TodoStatus) -> TodoView {
        TodoView {
            id,
            title: title.to_string(),
            status,
            problem_desc: None,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap(),
        }
    }

    fn test_app() -> App {
        App::new(AppConfig {
            base_url: "http://127.0.0.1:3000".to_string(),
            timezone: "Europe/Rome".to_string(),
            log_level: None,
        })
        .unwrap()
    }

    fn test_app_with_todos(todos: Vec<TodoView>) -> App {
        let mut app = test_app();
        let ticket = app.state.store.begin_load().unwrap();
        assert!(app.state.store.complete_load(ticket, todos));
        app
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let todos = vec![
            todo(1, "buy milk", TodoStatus::Created),
            todo(2, "write spec", TodoStatus::Created),
        ];
        let shown = filter_todos(&todos, "MILK");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id, 1);
    }

    #[test]
    fn empty_filter_shows_everything_in_order() {
        let todos = vec![
            todo(2, "write spec", TodoStatus::Created),
            todo(1, "buy milk", TodoStatus::Created),
        ];
        let shown = filter_todos(&todos, "");
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].id, 2);
    }

    #[test]
    fn filter_with_no_match_is_empty() {
        let todos = vec![todo(1, "buy milk", TodoStatus::Created)];
        assert!(filter_todos(&todos, "spec").is_empty());
    }

    #[tokio::test]
    async fn submitting_an_add_clears_the_input_eagerly() {
        let mut app = test_app();
        app.state.input = InputMode::Add;
        app.state.todos.add_input = "write spec".to_string();
        app.state.todos.add_error = Some("old error".to_string());

        app.submit();

        assert!(app.state.todos.add_input.is_empty());
        assert!(app.state.todos.add_pending);
        assert!(app.state.todos.add_error.is_none());
    }

    #[tokio::test]
    async fn submits_are_ignored_while_an_add_is_in_flight() {
        let mut app = test_app();
        app.state.input = InputMode::Add;
        app.state.todos.add_input = "first".to_string();
        app.submit();

        app.state.todos.add_input = "second".to_string();
        app.submit();

        // The second submission did not go through.
        assert_eq!(app.state.todos.add_input, "second");
    }

    #[tokio::test]
    async fn status_picker_is_disabled_while_an_update_is_in_flight() {
        let mut app = test_app_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]);
        app.state.todos.update_pending = true;

        app.input('s');

        assert_eq!(app.state.overlay, Overlay::None);
    }

    #[tokio::test]
    async fn picking_a_status_applies_the_optimistic_write() {
        let mut app = test_app_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]);

        app.input('s');
        assert_eq!(app.state.overlay, Overlay::StatusPick);
        // Cursor starts on the row's current status.
        assert_eq!(app.state.todos.status_cursor, 0);

        app.move_down();
        app.move_down();
        app.submit();

        assert_eq!(app.state.overlay, Overlay::None);
        assert_eq!(app.state.store.get(1).unwrap().status, TodoStatus::Completed);
        assert!(app.state.todos.update_pending);
    }

    #[test]
    fn selection_follows_the_filtered_view() {
        let mut app = test_app_with_todos(vec![
            todo(1, "buy milk", TodoStatus::Created),
            todo(2, "write spec", TodoStatus::Created),
        ]);
        app.state.todos.selected = 1;
        app.state.todos.filter = "milk".to_string();
        app.clamp_selection();

        assert_eq!(app.state.todos.selected, 0);
        assert_eq!(app.selected_id(), Some(1));
    }
}
