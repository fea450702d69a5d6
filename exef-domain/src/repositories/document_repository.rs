//! Repository interfaces for [`Document`], [`DocumentMetadata`], and
//! [`DocumentRelation`]. `find_by_doc_id_in_entity` backs the read-time
//! duplicate grouping described in spec.md §4.4 "Deduplication policy".

use crate::entities::{Document, DocumentMetadata, DocumentRelation};
use crate::error::FlowError;
use crate::value_objects::enums::RelationType;
use crate::value_objects::ids::{DocumentId, DocumentRelationId, EntityId, TaskId};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, FlowError>;
    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<Document>, FlowError>;
    async fn update(&self, document: &Document) -> Result<(), FlowError>;
    async fn delete(&self, id: &DocumentId) -> Result<bool, FlowError>;

    /// All documents in the entity sharing the given computed `doc_id`,
    /// used by the duplicate-grouping read path.
    async fn find_by_doc_id_in_entity(&self, entity: &EntityId, doc_id: &str) -> Result<Vec<Document>, FlowError>;

    /// Every distinct `doc_id` appearing on more than one document within
    /// `task`, paired with its member documents.
    async fn find_duplicates_in_task(&self, task: &TaskId) -> Result<Vec<(String, Vec<Document>)>, FlowError>;
}

#[async_trait]
pub trait DocumentMetadataRepository: Send + Sync {
    async fn save(&self, metadata: &DocumentMetadata) -> Result<(), FlowError>;
    async fn find_for_document(&self, document: &DocumentId) -> Result<Option<DocumentMetadata>, FlowError>;
    async fn update(&self, metadata: &DocumentMetadata) -> Result<(), FlowError>;
}

#[async_trait]
pub trait DocumentRelationRepository: Send + Sync {
    async fn save(&self, relation: &DocumentRelation) -> Result<(), FlowError>;
    async fn find_by_id(&self, id: &DocumentRelationId) -> Result<Option<DocumentRelation>, FlowError>;
    async fn exists(&self, parent: &DocumentId, child: &DocumentId, relation_type: RelationType) -> Result<bool, FlowError>;
    async fn list_for_document(&self, document: &DocumentId) -> Result<Vec<DocumentRelation>, FlowError>;
}
