use api_types::todo::{TodoNew, TodoStatus, TodoStatusUpdate, TodoView};
use reqwest::Url;

use crate::error::ApiError;

/// HTTP client for the remote todo service, base path `/api/todos`.
#[derive(Debug, Clone)]
pub struct TodoApi {
    base_url: Url,
    http: reqwest::Client,
}

impl TodoApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|err| ApiError::Endpoint(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Fetches the full collection, in server order.
    pub async fn list(&self) -> Result<Vec<TodoView>, ApiError> {
        let endpoint = self.endpoint("api/todos")?;
        tracing::debug!(%endpoint, "GET todos");
        let res = self.http.get(endpoint).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json::<Vec<TodoView>>().await?)
    }

    /// Creates a todo. The server assigns id, status and creation time.
    pub async fn create(&self, title: &str) -> Result<TodoView, ApiError> {
        let endpoint = self.endpoint("api/todos")?;
        let payload = TodoNew {
            title: title.to_string(),
        };
        tracing::debug!(%endpoint, "POST todo");
        let res = self.http.post(endpoint).json(&payload).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json::<TodoView>().await?)
    }

    /// Partially updates one todo, changing only its status.
    pub async fn update_status(&self, id: i64, status: TodoStatus) -> Result<TodoView, ApiError> {
        let endpoint = self.endpoint(&format!("api/todos/{id}"))?;
        let payload = TodoStatusUpdate { status };
        tracing::debug!(%endpoint, status = status.as_str(), "PATCH todo");
        let res = self.http.patch(endpoint).json(&payload).send().await?;
        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }
        Ok(res.json::<TodoView>().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Endpoint(format!("{path}: {err}")))
    }
}
