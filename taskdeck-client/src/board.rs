/// Task-list view model
///
/// Holds the fetched task list and the active status filter. Every
/// mutation goes to the API and is followed by a full `List` refetch
/// instead of patching local state; simpler to keep consistent, at the
/// cost of one extra request per mutation. Filtering is purely local and
/// never touches the network.

use crate::error::ClientError;
use crate::http::{ApiClient, TaskPatch};
use std::sync::Arc;
use taskdeck_shared::models::task::{Task, TaskStatus};
use uuid::Uuid;

/// Status filter applied to the already-fetched list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Show everything
    #[default]
    All,

    /// Only pending tasks
    Pending,

    /// Only completed tasks
    Completed,
}

impl StatusFilter {
    /// Whether a task with the given status passes this filter
    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }
}

/// View model over the caller's task list
pub struct TaskBoard {
    client: Arc<ApiClient>,
    tasks: Vec<Task>,
    filter: StatusFilter,
}

impl TaskBoard {
    /// Creates an empty board; call [`refresh`](Self::refresh) to load
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            filter: StatusFilter::All,
        }
    }

    /// Refetches the full task list from the server
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.tasks = self.client.list_tasks().await?;
        Ok(())
    }

    /// Creates a task, then refetches the list
    pub async fn create(
        &mut self,
        title: &str,
        description: Option<&str>,
    ) -> Result<(), ClientError> {
        self.client.create_task(title, description).await?;
        self.refresh().await
    }

    /// Updates a task, then refetches the list
    pub async fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<(), ClientError> {
        self.client.update_task(id, patch).await?;
        self.refresh().await
    }

    /// Deletes a task, then refetches the list
    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.client.delete_task(id).await?;
        self.refresh().await
    }

    /// Toggles a task, then refetches the list
    pub async fn toggle(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.client.toggle_task(id).await?;
        self.refresh().await
    }

    /// Sets the status filter; no request is made
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Active filter
    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// The full fetched list, server order (newest first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The fetched list with the active filter applied
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(t.status))
            .collect()
    }

    /// Number of tasks still pending, ignoring the filter
    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count()
    }
}
