//! # Project Authorization Entity
//!
//! Delegates access to a single project to an identity outside the owning
//! entity's membership (spec.md §4.5 step 2) — an external accountant
//! granted `view` + `describe` on one client project, for example.

use crate::value_objects::ids::{IdentityId, ProjectAuthorizationId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthorizationCapabilities {
    pub can_view: bool,
    pub can_describe: bool,
    pub can_approve: bool,
    pub can_export: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAuthorization {
    id: ProjectAuthorizationId,
    project: ProjectId,
    identity: IdentityId,
    capabilities: AuthorizationCapabilities,
    valid_from: DateTime<Utc>,
    valid_until: Option<DateTime<Utc>>,
    granted_by: IdentityId,
}

impl ProjectAuthorization {
    pub fn new(
        project: ProjectId,
        identity: IdentityId,
        capabilities: AuthorizationCapabilities,
        valid_from: DateTime<Utc>,
        granted_by: IdentityId,
    ) -> Self {
        Self {
            id: ProjectAuthorizationId::new(),
            project,
            identity,
            capabilities,
            valid_from,
            valid_until: None,
            granted_by,
        }
    }

    pub fn id(&self) -> &ProjectAuthorizationId {
        &self.id
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn identity(&self) -> &IdentityId {
        &self.identity
    }

    pub fn capabilities(&self) -> AuthorizationCapabilities {
        self.capabilities
    }

    pub fn set_valid_until(&mut self, until: DateTime<Utc>) {
        self.valid_until = Some(until);
    }

    /// Whether `now` falls within `[valid_from, valid_until)`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.valid_from && self.valid_until.map(|until| now < until).unwrap_or(true)
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }

    pub fn granted_by(&self) -> &IdentityId {
        &self.granted_by
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: ProjectAuthorizationId,
        project: ProjectId,
        identity: IdentityId,
        capabilities: AuthorizationCapabilities,
        valid_from: DateTime<Utc>,
        valid_until: Option<DateTime<Utc>>,
        granted_by: IdentityId,
    ) -> Self {
        Self {
            id,
            project,
            identity,
            capabilities,
            valid_from,
            valid_until,
            granted_by,
        }
    }
}
