//! Repository interface for [`DataSource`].

use crate::entities::DataSource;
use crate::error::FlowError;
use crate::value_objects::ids::{DataSourceId, ProjectId};
use async_trait::async_trait;

#[async_trait]
pub trait DataSourceRepository: Send + Sync {
    async fn save(&self, source: &DataSource) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &DataSourceId) -> Result<Option<DataSource>, FlowError>;
    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<DataSource>, FlowError>;
    async fn update(&self, source: &DataSource) -> Result<(), FlowError>;
}
