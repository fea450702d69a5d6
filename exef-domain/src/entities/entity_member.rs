//! # Entity Member Entity
//!
//! Maps an [`Identity`](super::identity::Identity) to an
//! [`Entity`](super::entity::Entity) with a role and three independent
//! capability flags. Role alone determines view access; the capability
//! flags are additive grants on top of it (spec.md §4.5).

use crate::value_objects::enums::MemberRole;
use crate::value_objects::ids::{EntityId, EntityMemberId, IdentityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMember {
    id: EntityMemberId,
    entity: EntityId,
    identity: IdentityId,
    role: MemberRole,
    can_manage_projects: bool,
    can_invite_members: bool,
    can_export: bool,
}

impl EntityMember {
    pub fn new(entity: EntityId, identity: IdentityId, role: MemberRole) -> Self {
        let is_owner = matches!(role, MemberRole::Owner);
        Self {
            id: EntityMemberId::new(),
            entity,
            identity,
            role,
            can_manage_projects: is_owner,
            can_invite_members: is_owner,
            can_export: is_owner,
        }
    }

    pub fn id(&self) -> &EntityMemberId {
        &self.id
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn identity(&self) -> &IdentityId {
        &self.identity
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn can_manage_projects(&self) -> bool {
        self.can_manage_projects || matches!(self.role, MemberRole::Owner)
    }

    pub fn can_invite_members(&self) -> bool {
        self.can_invite_members || matches!(self.role, MemberRole::Owner)
    }

    pub fn can_export(&self) -> bool {
        self.can_export || matches!(self.role, MemberRole::Owner)
    }

    pub fn set_capabilities(&mut self, manage_projects: bool, invite_members: bool, export: bool) {
        self.can_manage_projects = manage_projects;
        self.can_invite_members = invite_members;
        self.can_export = export;
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: EntityMemberId,
        entity: EntityId,
        identity: IdentityId,
        role: MemberRole,
        can_manage_projects: bool,
        can_invite_members: bool,
        can_export: bool,
    ) -> Self {
        Self {
            id,
            entity,
            identity,
            role,
            can_manage_projects,
            can_invite_members,
            can_export,
        }
    }
}
