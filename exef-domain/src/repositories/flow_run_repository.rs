//! Repository interfaces for [`ImportRun`] and [`ExportRun`] history
//! records.

use crate::entities::{ExportRun, ImportRun};
use crate::error::FlowError;
use crate::value_objects::ids::{ExportRunId, ImportRunId, TaskId};
use async_trait::async_trait;

#[async_trait]
pub trait ImportRunRepository: Send + Sync {
    async fn save(&self, run: &ImportRun) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &ImportRunId) -> Result<Option<ImportRun>, FlowError>;
    async fn update(&self, run: &ImportRun) -> Result<(), FlowError>;
    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<ImportRun>, FlowError>;
}

#[async_trait]
pub trait ExportRunRepository: Send + Sync {
    async fn save(&self, run: &ExportRun) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &ExportRunId) -> Result<Option<ExportRun>, FlowError>;
    async fn update(&self, run: &ExportRun) -> Result<(), FlowError>;
    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<ExportRun>, FlowError>;
}
