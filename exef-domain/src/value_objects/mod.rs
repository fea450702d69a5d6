//! Domain value objects: immutable, identity-free types defined entirely
//! by their attributes.

pub mod document_identity;
pub mod enums;
pub mod id;
pub mod ids;
pub mod tax_id;

pub use enums::{
    DocumentKind, DocumentStatus, EntityKind, MemberRole, OutputFormat, PhaseStatus, ProjectKind, RelationType,
    ResourceKind, RunStatus, SourceDirection, StorageMode, SyncDirection, TaskRecurrence, TaskStatus,
};
pub use id::{GenericId, IdCategory};
pub use ids::{
    DataSourceId, DocumentId, DocumentRelationId, EntityDatabaseId, EntityId, EntityMemberId, ExportRunId,
    IdentityId, ImportRunId, ProjectAuthorizationId, ProjectId, ProjectTemplateId, TaskId,
};
pub use tax_id::TaxId;
