use std::time::Duration;

use api::tasks::{
    CreateTaskRequest, Task, TaskListQuery, TaskListResponse, TaskResponse, UpdateTaskRequest,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use crate::{
    config::ClientConfig,
    remote::{ApiError, RemoteTasks},
};

#[derive(Debug, Clone)]
pub struct TasksClient {
    client: Client,
    api_base: Url,
}

impl TasksClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
        })
    }

    fn collection_endpoint(&self) -> Url {
        let mut url = self.api_base.clone();
        url.set_path("/api/tasks");
        url
    }

    fn task_endpoint(&self, id: &str) -> Url {
        let mut url = self.api_base.clone();
        url.set_path(&format!("/api/tasks/{id}"));
        url
    }

    async fn rejection(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("request failed with status {status}"));

        ApiError::Server { status, message }
    }
}

#[async_trait]
impl RemoteTasks for TasksClient {
    async fn list(&self, query: &TaskListQuery) -> Result<TaskListResponse, ApiError> {
        let url = self.collection_endpoint();
        tracing::debug!(%url, page = query.page, "requesting task page");

        let response = self.client.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json().await?)
    }

    async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.collection_endpoint())
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: TaskResponse = response.json().await?;
        Ok(body.task)
    }

    async fn update(&self, id: &str, patch: &UpdateTaskRequest) -> Result<Task, ApiError> {
        let response = self
            .client
            .patch(self.task_endpoint(id))
            .json(patch)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: TaskResponse = response.json().await?;
        Ok(body.task)
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let response = self.client.delete(self.task_endpoint(id)).send().await?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
