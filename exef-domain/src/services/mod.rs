//! Domain services: stateless operations over entities and value objects
//! that don't belong to any single entity (spec.md §4).

pub mod access_resolver;
pub mod adapter_contract;
pub mod document_identity_service;
pub mod document_match_service;
pub mod project_template_service;

pub use access_resolver::{AccessResolver, EffectiveAccess};
pub use adapter_contract::{ExportAdapter, ExportResult, ImportAdapter, ImportResult, TestConnectionResult};
pub use document_identity_service::{DocumentIdentityInput, DocumentIdentityService, Sha256DocumentIdentity};
pub use document_match_service::{DocumentMatchService, MatchCandidate, MatchSuggestion};
pub use project_template_service::{generate_tasks_from_template, GeneratedTask};
