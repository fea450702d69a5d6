//! Repository interface for [`Identity`] persistence, grounded on the
//! async-trait shape `PipelineRepository` uses for its entity.

use crate::entities::Identity;
use crate::error::FlowError;
use crate::value_objects::ids::IdentityId;
use async_trait::async_trait;

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn save(&self, identity: &Identity) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, FlowError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, FlowError>;
    async fn update(&self, identity: &Identity) -> Result<(), FlowError>;
}
