use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use chrono::Utc;

use api_types::todo::{TodoNew, TodoStatus, TodoStatusUpdate, TodoView};
use client::{ApiError, StoreError, TodoApi, TodoStore};

#[derive(Default)]
struct ServiceState {
    todos: Vec<TodoView>,
    next_id: i64,
    fail_list: bool,
    fail_create: bool,
    fail_update: bool,
}

type Shared = Arc<Mutex<ServiceState>>;

async fn list(State(state): State<Shared>) -> Result<Json<Vec<TodoView>>, StatusCode> {
    let state = state.lock().unwrap();
    if state.fail_list {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.todos.clone()))
}

async fn create(
    State(state): State<Shared>,
    Json(payload): Json<TodoNew>,
) -> Result<Json<TodoView>, StatusCode> {
    let mut state = state.lock().unwrap();
    if state.fail_create {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    state.next_id += 1;
    let todo = TodoView {
        id: state.next_id,
        title: payload.title,
        status: TodoStatus::Created,
        problem_desc: None,
        created_at: Utc::now().fixed_offset(),
    };
    state.todos.push(todo.clone());
    Ok(Json(todo))
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoStatusUpdate>,
) -> Result<Json<TodoView>, StatusCode> {
    let mut state = state.lock().unwrap();
    if state.fail_update {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let todo = state
        .todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    todo.status = payload.status;
    Ok(Json(todo.clone()))
}

async fn service_with_todos(todos: Vec<TodoView>) -> (TodoApi, Shared) {
    let next_id = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
    let state = Arc::new(Mutex::new(ServiceState {
        todos,
        next_id,
        ..ServiceState::default()
    }));

    let router = Router::new()
        .route("/api/todos", get(list).post(create))
        .route("/api/todos/{id}", patch(update))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let api = TodoApi::new(&format!("http://{addr}")).unwrap();
    (api, state)
}

fn todo(id: i64, title: &str, status: TodoStatus) -> TodoView {
    TodoView {
        id,
        title: title.to_string(),
        status,
        problem_desc: None,
        created_at: Utc::now().fixed_offset(),
    }
}

#[tokio::test]
async fn load_installs_the_service_collection() {
    let (api, _state) = service_with_todos(vec![
        todo(1, "buy milk", TodoStatus::Created),
        todo(2, "write spec", TodoStatus::OnGoing),
    ])
    .await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    assert!(store.complete_load(ticket, fetched));

    let collection = store.collection().unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[0].title, "buy milk");
    assert_eq!(collection[1].title, "write spec");
}

#[tokio::test]
async fn failed_load_surfaces_fetch_error_and_keeps_stale_data() {
    let (api, state) = service_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]).await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    store.complete_load(ticket, fetched);

    state.lock().unwrap().fail_list = true;
    let ticket = store.begin_load().unwrap();
    let err = api.list().await.unwrap_err();
    assert!(store.fail_load(ticket));

    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    let message = StoreError::Fetch(err).to_string();
    assert!(message.starts_with("could not load todos"), "{message}");

    // Prior data stays displayed, stale.
    assert_eq!(store.collection().unwrap().len(), 1);
}

#[tokio::test]
async fn add_appends_exactly_the_server_record() {
    let (api, _state) = service_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]).await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    store.complete_load(ticket, fetched);

    let created = api.create("write spec").await.unwrap();
    assert_eq!(created.title, "write spec");
    assert_eq!(created.status, TodoStatus::Created);
    store.insert(created.clone());

    let collection = store.collection().unwrap();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[1], created);
}

#[tokio::test]
async fn failed_add_leaves_the_cache_unchanged() {
    let (api, state) = service_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]).await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    store.complete_load(ticket, fetched);

    state.lock().unwrap().fail_create = true;
    let err = api.create("write spec").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(_)));
    let message = StoreError::Mutation(err).to_string();
    assert!(message.starts_with("could not save changes"), "{message}");

    let collection = store.collection().unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].title, "buy milk");
}

#[tokio::test]
async fn confirmed_update_keeps_the_optimistic_write_and_reconciles() {
    let (api, _state) = service_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]).await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    store.complete_load(ticket, fetched);

    let update = store.begin_update(1, TodoStatus::Completed).unwrap();
    // Visible before the round-trip settles.
    assert_eq!(store.get(1).unwrap().status, TodoStatus::Completed);

    api.update_status(1, TodoStatus::Completed).await.unwrap();
    store.complete_update(update);
    assert!(store.is_stale());

    let reload = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    assert!(store.complete_load(reload, fetched));
    assert_eq!(store.get(1).unwrap().status, TodoStatus::Completed);
    assert!(!store.is_stale());
}

#[tokio::test]
async fn failed_update_rolls_back_and_reconciles_with_the_server() {
    let (api, state) = service_with_todos(vec![todo(1, "buy milk", TodoStatus::Created)]).await;
    let mut store = TodoStore::new();

    let ticket = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    store.complete_load(ticket, fetched);

    state.lock().unwrap().fail_update = true;
    let update = store.begin_update(1, TodoStatus::Completed).unwrap();
    assert_eq!(store.get(1).unwrap().status, TodoStatus::Completed);

    let err = api.update_status(1, TodoStatus::Completed).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 500));
    store.fail_update(update);

    // Badge reverts to the pre-mutation value.
    assert_eq!(store.get(1).unwrap().status, TodoStatus::Created);
    assert!(store.is_stale());

    state.lock().unwrap().fail_update = false;
    let reload = store.begin_load().unwrap();
    let fetched = api.list().await.unwrap();
    assert!(store.complete_load(reload, fetched));
    assert_eq!(store.get(1).unwrap().status, TodoStatus::Created);
}

#[tokio::test]
async fn updating_a_missing_todo_is_a_failure() {
    let (api, _state) = service_with_todos(Vec::new()).await;
    let err = api.update_status(99, TodoStatus::Completed).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(status) if status.as_u16() == 404));
}
