/**
 * Roles, Permissions and the Authorization Policy
 *
 * Role labels are stored as strings. They are parsed once into `Role` so
 * that the administrator check is a match on a variant instead of a string
 * comparison scattered across handlers. Handlers ask for a `Permission`;
 * the policy decides which roles grant it.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::backend::error::BackendError;
use crate::backend::middleware::auth::Principal;

/// Label of the administrator role, matched exactly and case-sensitively
pub const ADMIN_ROLE: &str = "Admin";

/// A role attached to a user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Administrator
    Admin,
    /// Any other label, kept verbatim
    Other(String),
}

impl Role {
    /// Parse a stored role label
    pub fn from_label(label: &str) -> Self {
        match label {
            ADMIN_ROLE => Self::Admin,
            other => Self::Other(other.to_string()),
        }
    }

    /// The stored label for this role
    pub fn label(&self) -> &str {
        match self {
            Self::Admin => ADMIN_ROLE,
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Operations guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// List the notification inbox
    ViewNotifications,
    /// Change the read state of notifications
    ManageNotifications,
}

/// Maps roles to the permissions they grant
#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    grants: HashMap<Role, HashSet<Permission>>,
}

impl Default for AuthorizationPolicy {
    /// Administrators may view and manage their notifications; no other role
    /// grants anything.
    fn default() -> Self {
        Self::empty().grant(
            Role::Admin,
            [Permission::ViewNotifications, Permission::ManageNotifications],
        )
    }
}

impl AuthorizationPolicy {
    /// A policy that grants nothing
    pub fn empty() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Grant permissions to a role
    pub fn grant(mut self, role: Role, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.grants.entry(role).or_default().extend(permissions);
        self
    }

    /// Whether any of `roles` grants `permission`
    pub fn allows(&self, roles: &[Role], permission: Permission) -> bool {
        roles.iter().any(|role| {
            self.grants
                .get(role)
                .is_some_and(|granted| granted.contains(&permission))
        })
    }

    /// Require a principal holding `permission`.
    ///
    /// A missing principal is treated like one without the permission.
    pub fn authorize<'a>(
        &self,
        principal: Option<&'a Principal>,
        permission: Permission,
    ) -> Result<&'a Principal, BackendError> {
        match principal {
            Some(principal) if self.allows(&principal.user.roles, permission) => Ok(principal),
            Some(principal) => {
                tracing::warn!(
                    "User {} lacks permission {:?}",
                    principal.user.id,
                    permission
                );
                Err(BackendError::Forbidden)
            }
            None => {
                tracing::warn!("Anonymous request for permission {:?}", permission);
                Err(BackendError::Forbidden)
            }
        }
    }
}
