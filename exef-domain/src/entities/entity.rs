//! # Entity (business) Entity
//!
//! The business whose documents are managed — a sole proprietorship,
//! marriage, company, or other organisation. An `Entity` transitively owns
//! all its [`super::project::Project`]s and [`super::document::Document`]s,
//! and is the unit the storage router shards on in per-entity mode.

use crate::value_objects::enums::EntityKind;
use crate::value_objects::ids::{EntityId, IdentityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    legal_name: String,
    tax_id: Option<String>,
    owner: IdentityId,
    archived: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, legal_name: impl Into<String>, owner: IdentityId) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            legal_name: legal_name.into(),
            tax_id: None,
            owner,
            archived: false,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn legal_name(&self) -> &str {
        &self.legal_name
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    pub fn set_tax_id(&mut self, tax_id: Option<String>) {
        self.tax_id = tax_id;
    }

    pub fn owner(&self) -> &IdentityId {
        &self.owner
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn archive(&mut self) {
        self.archived = true;
    }

    pub fn from_database(id: EntityId, kind: EntityKind, legal_name: String, tax_id: Option<String>, owner: IdentityId, archived: bool) -> Self {
        Self { id, kind, legal_name, tax_id, owner, archived }
    }
}
