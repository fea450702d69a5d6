//! # Document Metadata Entity
//!
//! Editable side-car to a [`Document`](super::document::Document): every
//! document has exactly one of these, created empty alongside the document
//! itself (spec.md §4.4 import algorithm step 4) so downstream code never
//! needs a null check on metadata.

use crate::value_objects::ids::{DocumentId, IdentityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    document: DocumentId,
    category: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    custom_fields: HashMap<String, String>,
    last_editor: Option<IdentityId>,
    last_edited_at: Option<DateTime<Utc>>,
    version: u32,
}

impl DocumentMetadata {
    /// The empty side-car created alongside a new document.
    pub fn empty(document: DocumentId) -> Self {
        Self {
            document,
            category: None,
            description: None,
            tags: Vec::new(),
            custom_fields: HashMap::new(),
            last_editor: None,
            last_edited_at: None,
            version: 0,
        }
    }

    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Applies a patch, bumping the monotonically increasing version.
    pub fn apply_patch(
        &mut self,
        category: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
        editor: IdentityId,
        at: DateTime<Utc>,
    ) {
        if let Some(c) = category {
            self.category = Some(c);
        }
        if let Some(d) = description {
            self.description = Some(d);
        }
        if let Some(t) = tags {
            self.tags = t;
        }
        self.last_editor = Some(editor);
        self.last_edited_at = Some(at);
        self.version += 1;
    }

    /// Merges incoming tags into the existing set rather than overwriting —
    /// `PATCH /documents/bulk-metadata`'s documented merge semantics
    /// (spec.md §6).
    pub fn merge_patch(
        &mut self,
        category: Option<String>,
        description: Option<String>,
        extra_tags: Vec<String>,
        editor: IdentityId,
        at: DateTime<Utc>,
    ) {
        if let Some(c) = category {
            self.category = Some(c);
        }
        if let Some(d) = description {
            self.description = Some(d);
        }
        for tag in extra_tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self.last_editor = Some(editor);
        self.last_edited_at = Some(at);
        self.version += 1;
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn custom_fields(&self) -> &HashMap<String, String> {
        &self.custom_fields
    }

    pub fn set_custom_fields(&mut self, fields: HashMap<String, String>) {
        self.custom_fields = fields;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        document: DocumentId,
        category: Option<String>,
        description: Option<String>,
        tags: Vec<String>,
        custom_fields: HashMap<String, String>,
        last_editor: Option<IdentityId>,
        last_edited_at: Option<DateTime<Utc>>,
        version: u32,
    ) -> Self {
        Self {
            document,
            category,
            description,
            tags,
            custom_fields,
            last_editor,
            last_edited_at,
            version,
        }
    }
}
