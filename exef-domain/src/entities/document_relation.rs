//! # Document Relation Entity
//!
//! A typed link between two documents: `(parent, child, relation_type)` is
//! unique (spec.md §3). The system does not enforce acyclicity — a document
//! can be both a parent and a child of the same relation type through
//! different links, and nothing checks for cycles.

use crate::value_objects::enums::RelationType;
use crate::value_objects::ids::{DocumentId, DocumentRelationId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRelation {
    id: DocumentRelationId,
    parent: DocumentId,
    child: DocumentId,
    relation_type: RelationType,
}

impl DocumentRelation {
    pub fn new(parent: DocumentId, child: DocumentId, relation_type: RelationType) -> Self {
        Self {
            id: DocumentRelationId::new(),
            parent,
            child,
            relation_type,
        }
    }

    pub fn id(&self) -> &DocumentRelationId {
        &self.id
    }

    pub fn parent(&self) -> &DocumentId {
        &self.parent
    }

    pub fn child(&self) -> &DocumentId {
        &self.child
    }

    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }

    /// The uniqueness key for `(parent, child, relation_type)`.
    pub fn key(&self) -> (DocumentId, DocumentId, RelationType) {
        (self.parent.clone(), self.child.clone(), self.relation_type)
    }

    pub fn from_database(id: DocumentRelationId, parent: DocumentId, child: DocumentId, relation_type: RelationType) -> Self {
        Self { id, parent, child, relation_type }
    }
}
