use api::tasks::{
    CreateTaskRequest, DEFAULT_PAGE_LIMIT, SortField, SortOrder, StatusFilter, Task, TaskListQuery,
    UpdateTaskRequest, clamp_priority,
};
use client::RemoteTasks;
use tracing::warn;

/// Client-side mirror of the remote task list.
///
/// Holds the most recently settled page together with the staged query
/// parameters, and reconciles every remote response (or failure) back into
/// that state. Mutations are optimistic: the local copy changes first and
/// is restored from a snapshot when the remote call fails. No operation
/// returns an error to the caller — failures land in `error` as the
/// user-facing message.
///
/// Operations borrow the store exclusively, so two remote calls can never
/// be in flight against the same store at once.
#[derive(Debug)]
pub struct TaskStore<R> {
    remote: R,
    tasks: Vec<Task>,
    total: u64,
    total_pages: u32,
    query: TaskListQuery,
    loading: bool,
    error: Option<String>,
}

impl<R> TaskStore<R> {
    pub fn new(remote: R) -> Self {
        Self::with_page_size(remote, DEFAULT_PAGE_LIMIT)
    }

    /// A store whose fetches request `page_size` tasks per page.
    pub fn with_page_size(remote: R, page_size: u32) -> Self {
        let query = TaskListQuery {
            limit: page_size.max(1),
            ..TaskListQuery::default()
        };

        Self {
            remote,
            tasks: Vec::new(),
            total: 0,
            total_pages: 1,
            query,
            loading: false,
            error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn limit(&self) -> u32 {
        self.query.limit
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn query(&self) -> &TaskListQuery {
        &self.query
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_prev(&self) -> bool {
        self.query.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.query.page < self.total_pages
    }

    /// Stage a free-text filter. Resets `page` to 1; takes effect on the
    /// next fetch.
    pub fn set_query(&mut self, q: impl Into<String>) {
        self.query.q = q.into();
        self.query.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortField) {
        self.query.sort = sort;
        self.query.page = 1;
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.query.order = order;
        self.query.page = 1;
    }

    /// Stage a page change without resetting it; pages are 1-based.
    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Apply `patch` to the local copy and return the pre-patch snapshot,
    /// or `None` when the task is not on the current page.
    fn apply_patch(&mut self, id: &str, patch: &UpdateTaskRequest) -> Option<Task> {
        let task = self.task_mut(id)?;
        let snapshot = task.clone();

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(done) = patch.done {
            task.done = done;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category) = &patch.category {
            task.category = category.clone();
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }

        Some(snapshot)
    }
}

impl<R: RemoteTasks> TaskStore<R> {
    /// Fetch the page matching the staged query parameters and replace the
    /// snapshot wholesale. The server echo is authoritative for `page` and
    /// `limit`. A failed fetch leaves the previous snapshot untouched.
    pub async fn fetch_tasks(&mut self) {
        self.loading = true;
        self.error = None;

        match self.remote.list(&self.query).await {
            Ok(page) => {
                self.tasks = page.tasks;
                self.total = page.total;
                self.query.page = page.page;
                self.query.limit = page.limit;
                self.total_pages = page.total_pages;
            }
            Err(err) => {
                warn!(%err, "task list fetch failed");
                self.error = Some(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Create a task and prepend the server's representation. Default sort
    /// is newest-first, so the head is where a fresh task belongs; this is
    /// a deliberate approximation of its true rank.
    pub async fn create_task(&mut self, request: CreateTaskRequest) {
        self.loading = true;
        self.error = None;

        match self.remote.create(&request).await {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.total += 1;
            }
            Err(err) => {
                warn!(%err, "task create failed");
                self.error = Some(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Optimistically patch a task: snapshot, apply locally, send. On
    /// success the server representation wins; on failure the snapshot is
    /// written back and `error` is set. An id that is not on the current
    /// page still sends the request but never mutates local state.
    pub async fn update_task(&mut self, id: &str, patch: UpdateTaskRequest) {
        self.error = None;

        let snapshot = self.apply_patch(id, &patch);

        match self.remote.update(id, &patch).await {
            Ok(task) => {
                if let Some(local) = self.task_mut(id) {
                    *local = task;
                }
            }
            Err(err) => {
                warn!(%err, id, "task update failed; rolling back");
                if let Some(prior) = snapshot {
                    if let Some(local) = self.task_mut(id) {
                        *local = prior;
                    }
                }
                self.error = Some(err.to_string());
            }
        }
    }

    pub async fn toggle_done(&mut self, id: &str, done: bool) {
        let patch = UpdateTaskRequest {
            done: Some(done),
            ..Default::default()
        };
        self.update_task(id, patch).await;
    }

    /// Patch a task's priority, clamping the input into [1, 10] before it
    /// is sent.
    pub async fn update_priority(&mut self, id: &str, priority: f64) {
        let patch = UpdateTaskRequest {
            priority: Some(clamp_priority(priority)),
            ..Default::default()
        };
        self.update_task(id, patch).await;
    }

    /// Optimistically remove a task. On failure the removed task reappears
    /// at the front of the list, not at its original position.
    pub async fn delete_task(&mut self, id: &str) {
        self.error = None;

        let removed = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .map(|index| self.tasks.remove(index));
        if removed.is_some() {
            self.total = self.total.saturating_sub(1);
        }

        if let Err(err) = self.remote.delete(id).await {
            warn!(%err, id, "task delete failed; restoring");
            if let Some(task) = removed {
                self.tasks.insert(0, task);
                self.total += 1;
            }
            self.error = Some(err.to_string());
        }
    }

    /// Fetch with whatever query parameters are currently staged.
    pub async fn apply(&mut self) {
        self.fetch_tasks().await;
    }

    /// Restore the default filters (the configured page size survives) and
    /// fetch.
    pub async fn reset_filters(&mut self) {
        self.query = TaskListQuery {
            limit: self.query.limit,
            ..TaskListQuery::default()
        };
        self.fetch_tasks().await;
    }

    pub async fn prev_page(&mut self) {
        if self.can_prev() {
            self.query.page -= 1;
            self.fetch_tasks().await;
        }
    }

    pub async fn next_page(&mut self) {
        if self.can_next() {
            self.query.page += 1;
            self.fetch_tasks().await;
        }
    }
}
