//! Repository interfaces for [`Project`], [`ProjectTemplate`], and
//! [`ProjectAuthorization`].

use crate::entities::{Project, ProjectAuthorization, ProjectTemplate};
use crate::error::FlowError;
use crate::value_objects::ids::{EntityId, IdentityId, ProjectAuthorizationId, ProjectId, ProjectTemplateId};
use async_trait::async_trait;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn save(&self, project: &Project) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, FlowError>;
    async fn list_for_entity(&self, entity: &EntityId) -> Result<Vec<Project>, FlowError>;
    async fn update(&self, project: &Project) -> Result<(), FlowError>;
    async fn delete(&self, id: &ProjectId) -> Result<bool, FlowError>;
}

#[async_trait]
pub trait ProjectTemplateRepository: Send + Sync {
    async fn save(&self, template: &ProjectTemplate) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &ProjectTemplateId) -> Result<Option<ProjectTemplate>, FlowError>;
    async fn list_system_templates(&self) -> Result<Vec<ProjectTemplate>, FlowError>;
    async fn list_for_owner(&self, owner: &IdentityId) -> Result<Vec<ProjectTemplate>, FlowError>;
}

#[async_trait]
pub trait ProjectAuthorizationRepository: Send + Sync {
    async fn save(&self, auth: &ProjectAuthorization) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &ProjectAuthorizationId) -> Result<Option<ProjectAuthorization>, FlowError>;
    async fn find(&self, project: &ProjectId, identity: &IdentityId) -> Result<Option<ProjectAuthorization>, FlowError>;
    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<ProjectAuthorization>, FlowError>;
}
