//! Domain entities: objects with identity that persists across state
//! changes. See spec.md §3 for the full data model these mirror.

pub mod data_source;
pub mod document;
pub mod document_metadata;
pub mod document_relation;
pub mod entity;
pub mod entity_database;
pub mod entity_member;
pub mod flow_run;
pub mod identity;
pub mod project;
pub mod project_authorization;
pub mod project_template;
pub mod resource_routing;
pub mod task;

pub use data_source::DataSource;
pub use document::Document;
pub use document_metadata::DocumentMetadata;
pub use document_relation::DocumentRelation;
pub use entity::Entity;
pub use entity_database::EntityDatabase;
pub use entity_member::EntityMember;
pub use flow_run::{ExportRun, ImportRun};
pub use identity::Identity;
pub use project::Project;
pub use project_authorization::{AuthorizationCapabilities, ProjectAuthorization};
pub use project_template::ProjectTemplate;
pub use resource_routing::ResourceRouting;
pub use task::{Task, TaskCounters};
