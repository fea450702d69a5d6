//! sqlx-backed implementations of every `exef_domain::repositories` trait.
//! One file per aggregate group, mirroring the domain crate's own grouping
//! (`document_repository.rs` covers `Document`+`DocumentMetadata`+
//! `DocumentRelation`, etc).

pub mod sqlite_data_source_repository;
pub mod sqlite_document_repository;
pub mod sqlite_entity_repository;
pub mod sqlite_flow_run_repository;
pub mod sqlite_identity_repository;
pub mod sqlite_project_repository;
pub mod sqlite_routing_repository;
pub mod sqlite_task_repository;

pub use sqlite_data_source_repository::SqliteDataSourceRepository;
pub use sqlite_document_repository::{SqliteDocumentMetadataRepository, SqliteDocumentRelationRepository, SqliteDocumentRepository};
pub use sqlite_entity_repository::{SqliteEntityDatabaseRepository, SqliteEntityMemberRepository, SqliteEntityRepository};
pub use sqlite_flow_run_repository::{SqliteExportRunRepository, SqliteImportRunRepository};
pub use sqlite_identity_repository::SqliteIdentityRepository;
pub use sqlite_project_repository::{SqliteProjectAuthorizationRepository, SqliteProjectRepository, SqliteProjectTemplateRepository};
pub use sqlite_routing_repository::SqliteRoutingRepository;
pub use sqlite_task_repository::SqliteTaskRepository;

use exef_domain::FlowError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialises an enum using its own snake_case `Serialize` impl, stripping
/// the surrounding quotes `serde_json` adds for a bare string, so it stores
/// as a plain SQLite TEXT value (`"invoice"` -> `invoice`).
pub(crate) fn enum_to_text<T: Serialize>(value: &T) -> Result<String, FlowError> {
    let json = serde_json::to_string(value)?;
    Ok(json.trim_matches('"').to_string())
}

/// Inverse of [`enum_to_text`].
pub(crate) fn text_to_enum<T: DeserializeOwned>(text: &str) -> Result<T, FlowError> {
    serde_json::from_str(&format!("\"{text}\"")).map_err(|e| FlowError::Serialization(e.to_string()))
}

/// Serialises a `Vec<String>`/`HashMap<String, _>` side field to JSON text.
pub(crate) fn json_to_text<T: Serialize>(value: &T) -> Result<String, FlowError> {
    Ok(serde_json::to_string(value)?)
}

/// Inverse of [`json_to_text`].
pub(crate) fn text_to_json<T: DeserializeOwned>(text: &str) -> Result<T, FlowError> {
    Ok(serde_json::from_str(text)?)
}

pub(crate) fn db_err(e: sqlx::Error) -> FlowError {
    FlowError::Database(e.to_string())
}
