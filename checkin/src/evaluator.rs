//! Field-level edit authorization.
//!
//! `editable = actor is admin || actor holds the field's owning role`.
//! Fields without an owner, or owned by a role outside the plant's set, are
//! admin-only. Every call is evaluated from the
//! actor's current roles; nothing is cached between calls.

use std::collections::BTreeSet;
use tracing::debug;

use crate::table::OwnershipTable;
use crate::types::{Actor, CheckinError, CheckinField, Result, Role};

/// Which roles count as administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPolicy {
    admin_roles: BTreeSet<Role>,
}

impl AdminPolicy {
    pub fn new(admin_roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            admin_roles: admin_roles.into_iter().collect(),
        }
    }

    /// Policy under which nobody is an administrator.
    pub fn none() -> Self {
        Self {
            admin_roles: BTreeSet::new(),
        }
    }

    pub fn is_admin(&self, actor: &Actor) -> bool {
        actor.roles.iter().any(|role| self.admin_roles.contains(role))
    }
}

impl Default for AdminPolicy {
    fn default() -> Self {
        Self::new([Role::Admin])
    }
}

/// Decides which check-in sections an actor may edit.
#[derive(Debug, Clone, Default)]
pub struct FieldAuthorizer {
    table: OwnershipTable,
    admin: AdminPolicy,
}

impl FieldAuthorizer {
    pub fn new(table: OwnershipTable, admin: AdminPolicy) -> Self {
        Self { table, admin }
    }

    pub fn table(&self) -> &OwnershipTable {
        &self.table
    }

    pub fn admin_policy(&self) -> &AdminPolicy {
        &self.admin
    }

    /// Whether `actor` may edit the section with wire id `field_id`.
    pub fn can_edit(&self, actor: &Actor, field_id: &str) -> bool {
        let allowed = self.admin.is_admin(actor)
            || self
                .table
                .required_role(field_id)
                .filter(|role| role.is_known())
                .is_some_and(|role| actor.has_role(role));

        debug!(actor = %actor.name, field = field_id, allowed, "Evaluated field access");
        allowed
    }

    /// Typed form of [`Self::can_edit`].
    pub fn can_edit_field(&self, actor: &Actor, field: CheckinField) -> bool {
        self.can_edit(actor, field.id())
    }

    /// `Ok` if editable, otherwise the denial to show the actor.
    pub fn check(&self, actor: &Actor, field_id: &str) -> Result<()> {
        if self.can_edit(actor, field_id) {
            Ok(())
        } else {
            Err(CheckinError::EditDenied {
                field: field_id.to_string(),
                actor: actor.name.clone(),
            })
        }
    }

    /// Sections the actor may edit, in form order.
    pub fn editable_fields(&self, actor: &Actor) -> Vec<CheckinField> {
        CheckinField::all()
            .into_iter()
            .filter(|field| self.can_edit_field(actor, *field))
            .collect()
    }
}
