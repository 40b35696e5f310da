//! Client-side synchronization against the remote todo service.
//!
//! [`TodoApi`] speaks the HTTP contract; [`TodoStore`] is the in-memory
//! collection cache with optimistic-update semantics. The store never
//! performs network calls itself: callers take a ticket, run the
//! round-trip, and report back, so every interleaving the UI can produce
//! is expressible (and testable) without a terminal or a server.

pub mod api;
pub mod error;
pub mod store;

pub use api::TodoApi;
pub use error::{ApiError, StoreError};
pub use store::{LoadTicket, TodoStore, UpdateTicket};
