//! # Project Template Entity
//!
//! A system- or user-owned blueprint for recurring project creation
//! (spec.md §4.5). [`crate::services::project_template_service`] turns a
//! template plus a target year into a fully-populated
//! [`Project`](super::project::Project) with its generated
//! [`Task`](super::task::Task)s.

use crate::value_objects::enums::{ProjectKind, TaskRecurrence};
use crate::value_objects::ids::{IdentityId, ProjectTemplateId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectTemplate {
    id: ProjectTemplateId,
    owner: Option<IdentityId>,
    kind: ProjectKind,
    recurrence: TaskRecurrence,
    task_name_template: String,
    deadline_day: u8,
    default_categories: Vec<String>,
}

impl ProjectTemplate {
    pub fn new(kind: ProjectKind, recurrence: TaskRecurrence, task_name_template: impl Into<String>, deadline_day: u8) -> Self {
        Self {
            id: ProjectTemplateId::new(),
            owner: None,
            kind,
            recurrence,
            task_name_template: task_name_template.into(),
            deadline_day,
            default_categories: Vec::new(),
        }
    }

    pub fn id(&self) -> &ProjectTemplateId {
        &self.id
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn recurrence(&self) -> TaskRecurrence {
        self.recurrence
    }

    pub fn task_name_template(&self) -> &str {
        &self.task_name_template
    }

    pub fn deadline_day(&self) -> u8 {
        self.deadline_day
    }

    pub fn default_categories(&self) -> &[String] {
        &self.default_categories
    }

    pub fn set_owner(&mut self, owner: IdentityId) {
        self.owner = Some(owner);
    }

    pub fn is_system_owned(&self) -> bool {
        self.owner.is_none()
    }

    pub fn owner(&self) -> Option<&IdentityId> {
        self.owner.as_ref()
    }

    pub fn set_default_categories(&mut self, categories: Vec<String>) {
        self.default_categories = categories;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: ProjectTemplateId,
        owner: Option<IdentityId>,
        kind: ProjectKind,
        recurrence: TaskRecurrence,
        task_name_template: String,
        deadline_day: u8,
        default_categories: Vec<String>,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            recurrence,
            task_name_template,
            deadline_day,
            default_categories,
        }
    }
}
