use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod todo {
    use super::*;

    /// Lifecycle state of a todo item.
    ///
    /// The server treats statuses as:
    /// - `created`: freshly added, nobody picked it up yet.
    /// - `on_going`: somebody is working on it.
    /// - `completed`: done.
    /// - `problem`: blocked; `problem_desc` may say why.
    ///
    /// `Unknown` is never sent by this client. It absorbs status values a
    /// newer server may introduce so deserialization keeps working.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TodoStatus {
        #[default]
        Created,
        OnGoing,
        Completed,
        Problem,
        #[serde(other)]
        Unknown,
    }

    impl TodoStatus {
        /// The statuses a user can assign, in picker order.
        pub const ALL: [TodoStatus; 4] = [
            TodoStatus::Created,
            TodoStatus::OnGoing,
            TodoStatus::Completed,
            TodoStatus::Problem,
        ];

        /// Returns the canonical status string used on the wire.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Created => "created",
                Self::OnGoing => "on_going",
                Self::Completed => "completed",
                Self::Problem => "problem",
                Self::Unknown => "unknown",
            }
        }

        /// Human-readable label for lists and badges.
        pub fn label(self) -> &'static str {
            match self {
                Self::Created => "Created",
                Self::OnGoing => "On going",
                Self::Completed => "Completed",
                Self::Problem => "Problem",
                Self::Unknown => "?",
            }
        }
    }

    /// Request body for creating a todo.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TodoNew {
        pub title: String,
    }

    /// Request body for changing a todo's status.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TodoStatusUpdate {
        pub status: TodoStatus,
    }

    /// A todo as returned by the service.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TodoView {
        /// Server-assigned, unique.
        pub id: i64,
        pub title: String,
        pub status: TodoStatus,
        /// Only meaningful for `problem` todos; optional everywhere.
        pub problem_desc: Option<String>,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
    }
}

#[cfg(test)]
mod tests {
    use super::todo::{TodoStatus, TodoView};

    #[test]
    fn statuses_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&TodoStatus::OnGoing).unwrap();
        assert_eq!(json, "\"on_going\"");
        let back: TodoStatus = serde_json::from_str("\"problem\"").unwrap();
        assert_eq!(back, TodoStatus::Problem);
    }

    #[test]
    fn unrecognized_status_falls_back_to_unknown() {
        let status: TodoStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, TodoStatus::Unknown);
    }

    #[test]
    fn todo_view_parses_a_service_payload() {
        let payload = r#"{
            "id": 2,
            "title": "write spec",
            "status": "created",
            "problem_desc": null,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let todo: TodoView = serde_json::from_str(payload).unwrap();
        assert_eq!(todo.id, 2);
        assert_eq!(todo.title, "write spec");
        assert_eq!(todo.status, TodoStatus::Created);
        assert!(todo.problem_desc.is_none());
    }
}
