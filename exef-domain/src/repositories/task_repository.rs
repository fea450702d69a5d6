//! Repository interface for [`Task`].

use crate::entities::Task;
use crate::error::FlowError;
use crate::value_objects::ids::{ProjectId, TaskId};
use async_trait::async_trait;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn save(&self, task: &Task) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, FlowError>;
    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<Task>, FlowError>;
    async fn update(&self, task: &Task) -> Result<(), FlowError>;
}
