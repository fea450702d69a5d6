//! # Identity Entity
//!
//! A human principal: the holder of a login, the owner of entities, the
//! assignee of tasks. Distinct from [`super::entity::Entity`], which is the
//! business whose documents are managed.

use crate::value_objects::ids::IdentityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    email: String,
    first_name: String,
    last_name: String,
    tax_id: Option<String>,
    personal_id: Option<String>,
    verified: bool,
}

impl Identity {
    pub fn new(email: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: IdentityId::new(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            tax_id: None,
            personal_id: None,
            verified: false,
        }
    }

    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.tax_id.as_deref()
    }

    pub fn personal_id(&self) -> Option<&str> {
        self.personal_id.as_deref()
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.verified = verified;
    }

    pub fn set_tax_id(&mut self, tax_id: Option<String>) {
        self.tax_id = tax_id;
    }

    pub fn set_personal_id(&mut self, personal_id: Option<String>) {
        self.personal_id = personal_id;
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: IdentityId,
        email: String,
        first_name: String,
        last_name: String,
        tax_id: Option<String>,
        personal_id: Option<String>,
        verified: bool,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            tax_id,
            personal_id,
            verified,
        }
    }
}
