//! # Resource Routing Entity
//!
//! An index row mapping a resource identifier to its owning entity's tax
//! ID and kind, used only when per-entity storage mode is enabled
//! (spec.md §4.2). A routing row exists if and only if per-entity storage
//! is enabled for the owning entity — there is no routing table in shared
//! mode.

use crate::value_objects::enums::ResourceKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRouting {
    resource_id: String,
    entity_tax_id: String,
    resource_kind: ResourceKind,
}

impl ResourceRouting {
    pub fn new(resource_id: impl Into<String>, entity_tax_id: impl Into<String>, resource_kind: ResourceKind) -> Self {
        Self {
            resource_id: resource_id.into(),
            entity_tax_id: entity_tax_id.into(),
            resource_kind,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn entity_tax_id(&self) -> &str {
        &self.entity_tax_id
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }
}
