//! Repository interfaces for [`Entity`], [`EntityMember`], and
//! [`EntityDatabase`] — the three aggregates the storage router consults
//! to decide where a resource's rows live (spec.md §4.2).

use crate::entities::{Entity, EntityDatabase, EntityMember};
use crate::error::FlowError;
use crate::value_objects::ids::{EntityDatabaseId, EntityId, IdentityId};
use async_trait::async_trait;

#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn save(&self, entity: &Entity) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Entity>, FlowError>;
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Entity>, FlowError>;
    async fn update(&self, entity: &Entity) -> Result<(), FlowError>;
    async fn list_for_owner(&self, owner: &IdentityId) -> Result<Vec<Entity>, FlowError>;
}

#[async_trait]
pub trait EntityMemberRepository: Send + Sync {
    async fn save(&self, member: &EntityMember) -> Result<(), FlowError>;
    async fn find(&self, entity: &EntityId, identity: &IdentityId) -> Result<Option<EntityMember>, FlowError>;
    async fn list_for_entity(&self, entity: &EntityId) -> Result<Vec<EntityMember>, FlowError>;
    async fn list_for_identity(&self, identity: &IdentityId) -> Result<Vec<EntityMember>, FlowError>;
}

#[async_trait]
pub trait EntityDatabaseRepository: Send + Sync {
    async fn save(&self, db: &EntityDatabase) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &EntityDatabaseId) -> Result<Option<EntityDatabase>, FlowError>;
    async fn find_for_entity(&self, entity: &EntityId) -> Result<Option<EntityDatabase>, FlowError>;
    async fn update(&self, db: &EntityDatabase) -> Result<(), FlowError>;
}
