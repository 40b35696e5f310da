use api_types::todo::{TodoStatus, TodoView};

/// Grants the holder the right to install the result of one load.
///
/// Completion is ignored when the store superseded the load in the
/// meantime, so a stale response can never overwrite newer state.
#[derive(Clone, Copy, Debug)]
pub struct LoadTicket {
    generation: u64,
}

/// Tracks one status update from optimistic write to settlement.
#[derive(Clone, Copy, Debug)]
pub struct UpdateTicket {
    generation: u64,
    id: i64,
}

impl UpdateTicket {
    pub fn id(&self) -> i64 {
        self.id
    }
}

struct Rollback {
    generation: u64,
    pre_image: Vec<TodoView>,
}

/// In-memory cache of the todo collection, synchronized with the service.
///
/// The store is a plain state machine: callers obtain a ticket, run the
/// network round-trip themselves, and report back through the matching
/// completion call. Generation counters turn superseded loads and
/// superseded rollbacks into no-ops.
///
/// There is one rollback slot, not one per id. Overlapping status updates
/// supersede each other; the earlier update's pre-image is then stale and
/// is never applied.
#[derive(Default)]
pub struct TodoStore {
    todos: Option<Vec<TodoView>>,
    stale: bool,
    loading: bool,
    load_generation: u64,
    update_generation: u64,
    rollback: Option<Rollback>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached collection, in server response order. `None` until the
    /// first load completes.
    pub fn collection(&self) -> Option<&[TodoView]> {
        self.todos.as_deref()
    }

    pub fn get(&self, id: i64) -> Option<&TodoView> {
        self.todos.as_ref()?.iter().find(|todo| todo.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True when the collection must be re-fetched to reflect server state.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Registers an in-flight load. Returns `None` while another load is
    /// outstanding: concurrent reads of the collection are deduplicated.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(LoadTicket {
            generation: self.load_generation,
        })
    }

    /// Installs a fetched collection and clears staleness. Returns `false`
    /// when the ticket was superseded and the result was discarded.
    pub fn complete_load(&mut self, ticket: LoadTicket, todos: Vec<TodoView>) -> bool {
        if ticket.generation != self.load_generation {
            tracing::debug!("discarding superseded load result");
            return false;
        }
        self.loading = false;
        self.stale = false;
        self.todos = Some(todos);
        true
    }

    /// Records a failed load. Returns `false` when the ticket was
    /// superseded and the failure is moot. Previously cached data stays
    /// displayed, stale.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if ticket.generation != self.load_generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Appends a server-confirmed record after a successful create.
    ///
    /// Adds are not optimistic: nothing is inserted before the server
    /// replies, so a failed create leaves the cache untouched.
    pub fn insert(&mut self, todo: TodoView) {
        self.todos.get_or_insert_with(Vec::new).push(todo);
    }

    /// Applies an optimistic status write and arms the rollback slot.
    ///
    /// Any in-flight load is cancelled first so a stale response cannot
    /// overwrite the optimistic state. Returns `None` when no cached
    /// record has this id.
    pub fn begin_update(&mut self, id: i64, status: TodoStatus) -> Option<UpdateTicket> {
        let todos = self.todos.as_mut()?;
        if !todos.iter().any(|todo| todo.id == id) {
            return None;
        }

        self.load_generation += 1;
        self.loading = false;

        let pre_image = todos.clone();
        for todo in todos.iter_mut() {
            if todo.id == id {
                todo.status = status;
            }
        }

        self.update_generation += 1;
        self.rollback = Some(Rollback {
            generation: self.update_generation,
            pre_image,
        });
        tracing::debug!(id, status = status.as_str(), "optimistic status write");
        Some(UpdateTicket {
            generation: self.update_generation,
            id,
        })
    }

    /// Confirms an update: the optimistic write stays, and the collection
    /// is invalidated so the next load reconciles with the server.
    pub fn complete_update(&mut self, ticket: UpdateTicket) {
        if self
            .rollback
            .as_ref()
            .is_some_and(|slot| slot.generation == ticket.generation)
        {
            self.rollback = None;
        }
        self.stale = true;
    }

    /// Rolls back a failed update, unless a later update superseded it.
    /// Either way the collection is invalidated for reconciliation.
    pub fn fail_update(&mut self, ticket: UpdateTicket) {
        match self.rollback.take() {
            Some(slot) if slot.generation == ticket.generation => {
                tracing::warn!(id = ticket.id, "status update failed, rolling back");
                self.todos = Some(slot.pre_image);
            }
            Some(slot) => {
                // Superseded: this pre-image belongs to a later update.
                self.rollback = Some(slot);
            }
            None => {}
        }
        self.stale = true;
    }
}
