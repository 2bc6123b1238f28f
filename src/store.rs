//! The owning service for shared access-control configuration.
//!
//! The role catalog, base matrix, and user records are process-wide shared
//! state edited by any team administrator. [`AccessStore`] puts them behind a
//! single lock with explicit read/write operations, so check-then-act
//! sequences (delete a role only if unused) are atomic and the concurrent-
//! edit policy is stated rather than implicit.
//!
//! Conflict policy: the catalog and base matrix form one versioned document.
//! Every mutation bumps the version. Grant edits may pass the version they
//! read; a mismatch is rejected with [`Error::StaleConfig`] (two admins, two
//! browser tabs). Callers that pass no version get last-write-wins. Per-user
//! overrides are per-user documents and sit outside the shared version.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::grants::{BaseMatrix, GrantMap};
use crate::level::{Level, LevelSet};
use crate::resolver::{Effective, User, UserId, resolve_effective};
use crate::role::{Role, RoleCatalog, RoleId};
use crate::section::Section;

struct Inner {
    catalog: RoleCatalog,
    matrix: BaseMatrix,
    users: HashMap<UserId, User>,
    version: u64,
}

/// In-memory access-control store.
///
/// All operations are synchronous and bounded by the fixed number of
/// sections; none of them suspend or perform IO.
pub struct AccessStore {
    inner: RwLock<Inner>,
}

impl AccessStore {
    /// A store with the built-in Administrator role and nothing else.
    pub fn new() -> AccessStore {
        AccessStore {
            inner: RwLock::new(Inner {
                catalog: RoleCatalog::builtin(),
                matrix: BaseMatrix::new(),
                users: HashMap::new(),
                version: 0,
            }),
        }
    }

    /// Load a store from a TOML seed document.
    pub fn from_seed_file(path: &Path) -> Result<AccessStore> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read seed file: {e}")))?;
        let seed: Seed = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse seed file: {e}")))?;
        AccessStore::from_seed(seed)
    }

    /// Build a store from parsed seed roles.
    pub fn from_seed(seed: Seed) -> Result<AccessStore> {
        let store = AccessStore::new();
        for role in seed.roles {
            let created = store.create_role(&role.name)?;
            for (section, set) in role.grants {
                for level in set.levels() {
                    store.set_role_grant(created.id, section, level, true, None)?;
                }
            }
        }
        Ok(store)
    }

    /// Current version of the shared configuration document.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    // ---- Role catalog ----------------------------------------------------

    /// All known roles, Administrator included.
    pub fn roles(&self) -> Vec<Role> {
        self.read().catalog.iter().cloned().collect()
    }

    pub fn role(&self, id: RoleId) -> Result<Role> {
        self.read()
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Role {id}")))
    }

    /// Create a custom role with a fresh id and an explicit empty
    /// base-matrix entry.
    pub fn create_role(&self, name: &str) -> Result<Role> {
        let name = RoleCatalog::validate_name(name)?;
        let mut inner = self.write();

        let role = Role {
            id: RoleId::new(),
            name,
            deletable: true,
        };
        inner.catalog.insert(role.clone());
        inner.matrix.insert_empty(role.id);
        inner.version += 1;

        info!(role = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// Rename a role in place. The Administrator role is not renameable.
    pub fn rename_role(&self, id: RoleId, new_name: &str) -> Result<Role> {
        let new_name = RoleCatalog::validate_name(new_name)?;
        if id == RoleId::ADMINISTRATOR {
            return Err(Error::Forbidden {
                resource: "the Administrator role".to_string(),
                action: "rename".to_string(),
            });
        }

        let mut inner = self.write();
        let role = inner
            .catalog
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("Role {id}")))?;
        role.name = new_name;
        let renamed = role.clone();
        inner.version += 1;
        Ok(renamed)
    }

    /// Delete a role and its base-matrix entry.
    ///
    /// Refused while any user's live base role is `id`; only live
    /// assignments count, not stale cached references. Other roles' grants
    /// and per-user overrides are untouched — override keys are sections,
    /// not role references, so there is nothing to cascade.
    pub fn delete_role(&self, id: RoleId) -> Result<()> {
        if id == RoleId::ADMINISTRATOR {
            return Err(Error::Forbidden {
                resource: "the Administrator role".to_string(),
                action: "delete".to_string(),
            });
        }

        let mut inner = self.write();
        if !inner.catalog.contains(id) {
            return Err(Error::NotFound(format!("Role {id}")));
        }

        let in_use = inner.users.values().filter(|u| u.role == Some(id)).count();
        if in_use > 0 {
            return Err(Error::Conflict(format!(
                "role is in use by {in_use} user(s)"
            )));
        }

        inner.catalog.remove(id);
        inner.matrix.remove(id);
        inner.version += 1;

        info!(role = %id, "Role deleted");
        Ok(())
    }

    // ---- Base matrix -----------------------------------------------------

    /// A role's base-matrix entry (explicit empty map for fresh roles).
    pub fn grants_for(&self, id: RoleId) -> Result<GrantMap> {
        let inner = self.read();
        if !inner.catalog.contains(id) {
            return Err(Error::NotFound(format!("Role {id}")));
        }
        Ok(inner.matrix.grants_for(id).cloned().unwrap_or_default())
    }

    /// Toggle a view/edit grant on a role's base-matrix entry.
    ///
    /// `expected_version`, when given, must match the current configuration
    /// version or the write is rejected with [`Error::StaleConfig`]. The
    /// Administrator role has no editable matrix entry — it resolves to full
    /// access regardless.
    pub fn set_role_grant(
        &self,
        id: RoleId,
        section: Section,
        level: Level,
        enabled: bool,
        expected_version: Option<u64>,
    ) -> Result<GrantMap> {
        if id == RoleId::ADMINISTRATOR {
            return Err(Error::Forbidden {
                resource: "the Administrator role".to_string(),
                action: "edit grants of".to_string(),
            });
        }

        let mut inner = self.write();
        if let Some(expected) = expected_version
            && expected != inner.version
        {
            return Err(Error::StaleConfig {
                expected,
                found: inner.version,
            });
        }
        if !inner.catalog.contains(id) {
            return Err(Error::NotFound(format!("Role {id}")));
        }

        let updated = inner
            .matrix
            .grants_for(id)
            .cloned()
            .unwrap_or_default()
            .with_level(section, level, enabled);
        inner.matrix.set(id, updated.clone());
        inner.version += 1;
        Ok(updated)
    }

    // ---- Users -----------------------------------------------------------

    /// Register a team member. The role, when given, must exist.
    pub fn create_user(&self, name: &str, role: Option<RoleId>) -> Result<User> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("User name must not be empty".to_string()));
        }

        let mut inner = self.write();
        if let Some(role) = role
            && !inner.catalog.contains(role)
        {
            return Err(Error::NotFound(format!("Role {role}")));
        }

        let user = User {
            id: UserId::new(),
            name: trimmed.to_string(),
            role,
            overrides: GrantMap::new(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn user(&self, id: UserId) -> Result<User> {
        self.read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("User {id}")))
    }

    pub fn users(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    /// Change a user's base role.
    pub fn assign_role(&self, user_id: UserId, role: RoleId) -> Result<User> {
        let mut inner = self.write();
        if !inner.catalog.contains(role) {
            return Err(Error::NotFound(format!("Role {role}")));
        }
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("User {user_id}")))?;
        user.role = Some(role);
        Ok(user.clone())
    }

    /// Toggle a view/edit level on a user's override for one section.
    ///
    /// Overrides are created lazily — a user with no custom permissions has
    /// an empty override map and inherits the base matrix everywhere.
    pub fn set_user_override(
        &self,
        user_id: UserId,
        section: Section,
        level: Level,
        enabled: bool,
    ) -> Result<GrantMap> {
        let mut inner = self.write();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("User {user_id}")))?;
        user.overrides = user.overrides.with_level(section, level, enabled);
        Ok(user.overrides.clone())
    }

    /// Drop a user's override entry for one section, restoring inheritance
    /// of the base matrix there.
    pub fn clear_user_override(&self, user_id: UserId, section: Section) -> Result<GrantMap> {
        let mut inner = self.write();
        let user = inner
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("User {user_id}")))?;
        user.overrides = user.overrides.without(section);
        Ok(user.overrides.clone())
    }

    /// Resolve the effective permissions for a user against the current
    /// base matrix.
    pub fn resolve(&self, user_id: UserId) -> Result<Effective> {
        let inner = self.read();
        let user = inner
            .users
            .get(&user_id)
            .ok_or_else(|| Error::NotFound(format!("User {user_id}")))?;
        Ok(resolve_effective(user, &inner.matrix))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for AccessStore {
    fn default() -> Self {
        AccessStore::new()
    }
}

/// Seed document for initializing a store from configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub roles: Vec<SeedRole>,
}

/// One role in a seed document: a name plus its default grants.
#[derive(Debug, Deserialize)]
pub struct SeedRole {
    pub name: String,
    #[serde(default)]
    pub grants: std::collections::BTreeMap<Section, LevelSet>,
}
