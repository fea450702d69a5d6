//! Repository interface for [`ResourceRouting`] rows, used by the storage
//! router to resolve which entity database owns a resource (spec.md §4.2).

use crate::entities::ResourceRouting;
use crate::error::FlowError;
use async_trait::async_trait;

#[async_trait]
pub trait RoutingRepository: Send + Sync {
    async fn save(&self, routing: &ResourceRouting) -> Result<(), FlowError>;
    async fn find_entity_tax_id(&self, resource_id: &str) -> Result<Option<String>, FlowError>;
    async fn is_empty(&self) -> Result<bool, FlowError>;
}
