//! # Access Resolver
//!
//! Computes the effective permission set an identity holds on a project by
//! combining entity membership with project-level delegation (spec.md
//! §4.5). This is a pure, stateless domain service: the application layer
//! looks up the `EntityMember` and `ProjectAuthorization` rows and passes
//! them in, so the domain never touches a repository directly — grounded
//! on the stateless, side-effect-free domain-service shape `pipeline-domain`
//! uses throughout `services/`.
//!
//! Polish-language denial reasons are preserved verbatim from the source
//! system's access layer, since spec.md §7 requires "a human-readable
//! Polish message" at the HTTP boundary and `FlowError::PermissionDenied`'s
//! `Display` text is what that boundary would show.

use crate::entities::{EntityMember, ProjectAuthorization};
use crate::error::FlowError;
use crate::value_objects::enums::MemberRole;
use chrono::{DateTime, Utc};

/// The four capability flags spec.md §6 names for `/match`, `/documents`,
/// and project routes, plus the two entity-scoped capabilities carried by
/// membership alone.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct EffectiveAccess {
    pub can_view: bool,
    pub can_describe: bool,
    pub can_approve: bool,
    pub can_export: bool,
    /// Only ever true for entity members; an external authorisation can
    /// never grant project or member management (spec.md §4.5 "Write
    /// operations").
    pub can_manage_projects: bool,
}

impl EffectiveAccess {
    pub const fn denied() -> Self {
        Self {
            can_view: false,
            can_describe: false,
            can_approve: false,
            can_export: false,
            can_manage_projects: false,
        }
    }

    pub fn is_denied(&self) -> bool {
        !self.can_view
    }
}

/// Stateless resolver implementing spec.md §4.5's three-step algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessResolver;

impl AccessResolver {
    pub fn new() -> Self {
        Self
    }

    /// Step 1/2/3: membership takes priority over delegation; if neither
    /// exists, access is denied. `authorization` must already be filtered
    /// to the project in question; its validity window is checked here
    /// against `now`.
    pub fn resolve(
        &self,
        membership: Option<&EntityMember>,
        authorization: Option<&ProjectAuthorization>,
        now: DateTime<Utc>,
    ) -> EffectiveAccess {
        if let Some(member) = membership {
            let describe_approve = member.role().at_least_accountant();
            return EffectiveAccess {
                can_view: true,
                can_describe: describe_approve,
                can_approve: describe_approve,
                can_export: member.can_export(),
                can_manage_projects: member.can_manage_projects(),
            };
        }

        if let Some(auth) = authorization {
            if auth.is_active_at(now) {
                let caps = auth.capabilities();
                return EffectiveAccess {
                    can_view: caps.can_view,
                    can_describe: caps.can_describe,
                    can_approve: caps.can_approve,
                    can_export: caps.can_export,
                    can_manage_projects: false,
                };
            }
        }

        EffectiveAccess::denied()
    }

    /// spec.md §4.5 "Write operations": patch/describe requires
    /// `can_describe`.
    pub fn require_describe(&self, access: &EffectiveAccess) -> Result<(), FlowError> {
        if access.can_describe {
            Ok(())
        } else {
            Err(FlowError::permission_denied("Brak uprawnień do edycji projektu"))
        }
    }

    /// spec.md §4.5 "Write operations": status transitions to approved
    /// require `can_approve`.
    pub fn require_approve(&self, access: &EffectiveAccess) -> Result<(), FlowError> {
        if access.can_approve {
            Ok(())
        } else {
            Err(FlowError::permission_denied("Brak uprawnień do zatwierdzania dokumentów"))
        }
    }

    /// spec.md §4.5 "Write operations": triggering an export run requires
    /// `can_export`.
    pub fn require_export(&self, access: &EffectiveAccess) -> Result<(), FlowError> {
        if access.can_export {
            Ok(())
        } else {
            Err(FlowError::permission_denied("Brak uprawnień do eksportu dokumentów"))
        }
    }

    pub fn require_view(&self, access: &EffectiveAccess) -> Result<(), FlowError> {
        if access.can_view {
            Ok(())
        } else {
            Err(FlowError::permission_denied("Brak dostępu do projektu"))
        }
    }

    /// spec.md §4.5 "Entity-level operations": renaming/archiving/storage
    /// config changes require owner membership specifically, not merely
    /// `can_manage_projects`.
    pub fn require_owner(&self, membership: Option<&EntityMember>) -> Result<(), FlowError> {
        match membership {
            Some(m) if matches!(m.role(), MemberRole::Owner) => Ok(()),
            _ => Err(FlowError::permission_denied("Tylko właściciel podmiotu może wykonać tę operację")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProjectAuthorization;
    use crate::value_objects::ids::{EntityId, IdentityId, ProjectId};

    fn member(role: MemberRole) -> EntityMember {
        EntityMember::new(EntityId::new(), IdentityId::new(), role)
    }

    #[test]
    fn owner_membership_grants_everything() {
        let resolver = AccessResolver::new();
        let m = member(MemberRole::Owner);
        let access = resolver.resolve(Some(&m), None, Utc::now());
        assert!(access.can_view && access.can_describe && access.can_approve && access.can_export && access.can_manage_projects);
    }

    #[test]
    fn viewer_membership_cannot_describe() {
        let resolver = AccessResolver::new();
        let m = member(MemberRole::Viewer);
        let access = resolver.resolve(Some(&m), None, Utc::now());
        assert!(access.can_view);
        assert!(!access.can_describe);
        assert!(!access.can_approve);
    }

    #[test]
    fn no_membership_falls_back_to_authorization() {
        let resolver = AccessResolver::new();
        let caps = crate::entities::AuthorizationCapabilities {
            can_view: true,
            can_describe: true,
            can_approve: false,
            can_export: false,
        };
        let auth = ProjectAuthorization::new(ProjectId::new(), IdentityId::new(), caps, Utc::now(), IdentityId::new());
        let access = resolver.resolve(None, Some(&auth), Utc::now());
        assert!(access.can_view && access.can_describe);
        assert!(!access.can_approve);
        assert!(!access.can_manage_projects);
    }

    #[test]
    fn expired_authorization_denies_access() {
        let resolver = AccessResolver::new();
        let caps = crate::entities::AuthorizationCapabilities {
            can_view: true,
            can_describe: true,
            can_approve: true,
            can_export: true,
        };
        let mut auth = ProjectAuthorization::new(ProjectId::new(), IdentityId::new(), caps, Utc::now(), IdentityId::new());
        auth.set_valid_until(Utc::now());
        std::thread::sleep(std::time::Duration::from_millis(5));
        let access = resolver.resolve(None, Some(&auth), Utc::now());
        assert!(access.is_denied());
    }

    #[test]
    fn neither_membership_nor_authorization_is_denied() {
        let resolver = AccessResolver::new();
        let access = resolver.resolve(None, None, Utc::now());
        assert!(access.is_denied());
    }
}
