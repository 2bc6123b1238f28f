//! The role catalog: named permission bundles assignable to users.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque, stable role identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// The built-in Administrator role. Never renameable, never deletable,
    /// never restricted by the resolver.
    pub const ADMINISTRATOR: RoleId = RoleId(Uuid::nil());

    /// Mint a fresh identifier for a new custom role.
    pub fn new() -> RoleId {
        RoleId(Uuid::new_v4())
    }

    /// Parse an identifier from its string form.
    pub fn parse(s: &str) -> Result<RoleId> {
        Uuid::parse_str(s)
            .map(RoleId)
            .map_err(|_| Error::BadRequest(format!("Invalid role id: {s}")))
    }
}

impl Default for RoleId {
    fn default() -> Self {
        RoleId::new()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named permission role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    /// False only for the built-in Administrator role.
    pub deletable: bool,
}

/// The set of known roles.
///
/// Always contains the built-in Administrator role. Lifecycle operations
/// (create, rename, delete) live on [`crate::store::AccessStore`], which owns
/// the catalog together with the base matrix so the in-use check and the
/// deletion are evaluated under one lock.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleCatalog {
    roles: Vec<Role>,
}

impl RoleCatalog {
    /// A catalog containing only the built-in Administrator role.
    pub fn builtin() -> RoleCatalog {
        RoleCatalog {
            roles: vec![Role {
                id: RoleId::ADMINISTRATOR,
                name: "Administrator".to_string(),
                deletable: false,
            }],
        }
    }

    pub fn get(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == id)
    }

    pub fn contains(&self, id: RoleId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Validate and normalize a role display name.
    pub(crate) fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("Role name must not be empty".to_string()));
        }
        Ok(trimmed.to_string())
    }

    pub(crate) fn insert(&mut self, role: Role) {
        self.roles.push(role);
    }

    pub(crate) fn get_mut(&mut self, id: RoleId) -> Option<&mut Role> {
        self.roles.iter_mut().find(|role| role.id == id)
    }

    pub(crate) fn remove(&mut self, id: RoleId) {
        self.roles.retain(|role| role.id != id);
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        RoleCatalog::builtin()
    }
}
