//! Concrete id types for every entity in the data model, each a distinct
//! type at compile time via [`crate::define_id`] over [`super::id::GenericId`].

use crate::define_id;

define_id!(IdentityId, IdentityMarker, "identity");
define_id!(EntityId, EntityMarker, "entity");
define_id!(EntityMemberId, EntityMemberMarker, "entity_member");
define_id!(EntityDatabaseId, EntityDatabaseMarker, "entity_database");
define_id!(ProjectId, ProjectMarker, "project");
define_id!(ProjectTemplateId, ProjectTemplateMarker, "project_template");
define_id!(ProjectAuthorizationId, ProjectAuthorizationMarker, "project_authorization");
define_id!(TaskId, TaskMarker, "task");
define_id!(DocumentId, DocumentMarker, "document");
define_id!(DocumentRelationId, DocumentRelationMarker, "document_relation");
define_id!(DataSourceId, DataSourceMarker, "data_source");
define_id!(ImportRunId, ImportRunMarker, "import_run");
define_id!(ExportRunId, ExportRunMarker, "export_run");
