use api::tasks::{CreateTaskRequest, Task, TaskListQuery, TaskListResponse, UpdateTaskRequest};
use async_trait::async_trait;
use thiserror::Error;

/// Failure surfaced by the remote task service.
///
/// `Server` carries the service's own `message` when the response body has
/// one; its `Display` is the user-facing text. Not-found is not given a
/// dedicated variant — callers treat it like any other rejection.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// The remote task service contract the store programs against.
#[async_trait]
pub trait RemoteTasks: Send + Sync {
    async fn list(&self, query: &TaskListQuery) -> Result<TaskListResponse, ApiError>;

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ApiError>;

    async fn update(&self, id: &str, patch: &UpdateTaskRequest) -> Result<Task, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}
