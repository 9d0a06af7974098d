//! Exercises `TasksClient` against an in-process HTTP service standing in
//! for the remote task API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use api::tasks::{CreateTaskRequest, StatusFilter, TaskListQuery, UpdateTaskRequest};
use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use client::{ApiError, ClientConfig, RemoteTasks, TasksClient};
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

async fn serve(router: Router) -> Result<Url> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.unwrap();
    });
    Ok(Url::parse(&format!("http://{addr}"))?)
}

async fn client_for(router: Router) -> Result<TasksClient> {
    let base = serve(router).await?;
    Ok(TasksClient::new(&ClientConfig::new(base))?)
}

fn task_body(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": null,
        "done": false,
        "priority": 5,
        "category": null,
        "dueDate": null,
        "createdAt": "2026-08-01T10:00:00Z",
        "updatedAt": "2026-08-01T10:00:00Z"
    })
}

#[tokio::test]
async fn list_encodes_query_and_decodes_page() -> Result<()> {
    let seen: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::default();
    let recorded = seen.clone();

    let router = Router::new().route(
        "/api/tasks",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorded = recorded.clone();
            async move {
                *recorded.lock().unwrap() = Some(params);
                Json(json!({
                    "tasks": [task_body("a", "Buy milk")],
                    "total": 21,
                    "page": 2,
                    "limit": 20,
                    "totalPages": 2
                }))
            }
        }),
    );

    let client = client_for(router).await?;
    let query = TaskListQuery {
        q: "milk".to_string(),
        status: StatusFilter::Undone,
        page: 2,
        ..Default::default()
    };
    let page = client.list(&query).await?;

    assert_eq!(page.tasks.len(), 1);
    assert_eq!(page.tasks[0].id, "a");
    assert_eq!(page.total, 21);
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);

    let params = seen.lock().unwrap().take().expect("request was recorded");
    assert_eq!(params["q"], "milk");
    assert_eq!(params["status"], "undone");
    assert_eq!(params["sort"], "createdAt");
    assert_eq!(params["order"], "desc");
    assert_eq!(params["page"], "2");
    assert_eq!(params["limit"], "20");
    Ok(())
}

#[tokio::test]
async fn create_posts_payload_and_unwraps_envelope() -> Result<()> {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let recorded = seen.clone();

    let router = Router::new().route(
        "/api/tasks",
        post(move |Json(body): Json<Value>| {
            let recorded = recorded.clone();
            async move {
                let id = Uuid::new_v4().to_string();
                let title = body["title"].as_str().unwrap_or_default().to_string();
                *recorded.lock().unwrap() = Some(body);
                (
                    StatusCode::CREATED,
                    Json(json!({ "task": task_body(&id, &title) })),
                )
            }
        }),
    );

    let client = client_for(router).await?;
    let request = CreateTaskRequest::new("Buy milk").with_category("home");
    let task = client.create(&request).await?;

    assert_eq!(task.title, "Buy milk");
    let body = seen.lock().unwrap().take().expect("request was recorded");
    assert_eq!(
        body,
        json!({ "title": "Buy milk", "priority": 5, "category": "home" })
    );
    Ok(())
}

#[tokio::test]
async fn update_patches_single_task() -> Result<()> {
    let seen: Arc<Mutex<Option<(String, Value)>>> = Arc::default();
    let recorded = seen.clone();

    let router = Router::new().route(
        "/api/tasks/{id}",
        patch(move |Path(id): Path<String>, Json(body): Json<Value>| {
            let recorded = recorded.clone();
            async move {
                let reply = task_body(&id, "Buy milk");
                *recorded.lock().unwrap() = Some((id, body));
                Json(json!({ "task": reply }))
            }
        }),
    );

    let client = client_for(router).await?;
    let patch = UpdateTaskRequest {
        done: Some(true),
        category: Some(None),
        ..Default::default()
    };
    let task = client.update("t1", &patch).await?;

    assert_eq!(task.id, "t1");
    let (id, body) = seen.lock().unwrap().take().expect("request was recorded");
    assert_eq!(id, "t1");
    assert_eq!(body, json!({ "done": true, "category": null }));
    Ok(())
}

#[tokio::test]
async fn delete_accepts_empty_success_body() -> Result<()> {
    let router = Router::new().route(
        "/api/tasks/{id}",
        delete(|Path(_id): Path<String>| async { StatusCode::NO_CONTENT }),
    );

    let client = client_for(router).await?;
    client.delete("t1").await?;
    Ok(())
}

#[tokio::test]
async fn server_message_becomes_the_error_text() -> Result<()> {
    let router = Router::new().route(
        "/api/tasks/{id}",
        patch(|Path(_id): Path<String>, Json(_body): Json<Value>| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "priority out of range" })),
            )
        }),
    );

    let client = client_for(router).await?;
    let patch = UpdateTaskRequest {
        priority: Some(10),
        ..Default::default()
    };
    let err = client.update("t1", &patch).await.unwrap_err();

    match &err {
        ApiError::Server { status, message } => {
            assert_eq!(*status, 422);
            assert_eq!(message, "priority out of range");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "priority out of range");
    Ok(())
}

#[tokio::test]
async fn missing_message_falls_back_to_status() -> Result<()> {
    let router = Router::new().route(
        "/api/tasks",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );

    let client = client_for(router).await?;
    let err = client.list(&TaskListQuery::default()).await.unwrap_err();

    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "request failed with status 500");
        }
        other => panic!("expected server error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn delete_of_missing_task_is_a_generic_rejection() -> Result<()> {
    let router = Router::new().route(
        "/api/tasks/{id}",
        delete(|Path(_id): Path<String>| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "task not found" })),
            )
        }),
    );

    let client = client_for(router).await?;
    let err = client.delete("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "task not found");
    Ok(())
}
