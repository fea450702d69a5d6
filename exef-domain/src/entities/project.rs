//! # Project Entity
//!
//! A time-bounded workstream inside an [`Entity`](super::entity::Entity) —
//! a bookkeeping period, a JPK submission, a client engagement. Every
//! [`Task`](super::task::Task) and [`Document`](super::document::Document)
//! reachable from a project lives in the same storage database as the
//! project itself (spec.md §3 invariant).

use crate::value_objects::enums::ProjectKind;
use crate::value_objects::ids::{EntityId, ProjectId, ProjectTemplateId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    entity: EntityId,
    template: Option<ProjectTemplateId>,
    name: String,
    kind: ProjectKind,
    year: i32,
    period_start: NaiveDate,
    period_end: NaiveDate,
    categories: Vec<String>,
    tags: Vec<String>,
    active: bool,
    archived: bool,
}

impl Project {
    pub fn new(
        entity: EntityId,
        name: impl Into<String>,
        kind: ProjectKind,
        year: i32,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            entity,
            template: None,
            name: name.into(),
            kind,
            year,
            period_start,
            period_end,
            categories: Vec::new(),
            tags: Vec::new(),
            active: true,
            archived: false,
        }
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> (NaiveDate, NaiveDate) {
        (self.period_start, self.period_end)
    }

    pub fn template(&self) -> Option<&ProjectTemplateId> {
        self.template.as_ref()
    }

    pub fn set_template(&mut self, template: ProjectTemplateId) {
        self.template = Some(template);
    }

    pub fn is_active(&self) -> bool {
        self.active && !self.archived
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.active = false;
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: ProjectId,
        entity: EntityId,
        template: Option<ProjectTemplateId>,
        name: String,
        kind: ProjectKind,
        year: i32,
        period_start: NaiveDate,
        period_end: NaiveDate,
        categories: Vec<String>,
        tags: Vec<String>,
        active: bool,
        archived: bool,
    ) -> Self {
        Self {
            id,
            entity,
            template,
            name,
            kind,
            year,
            period_start,
            period_end,
            categories,
            tags,
            active,
            archived,
        }
    }
}
