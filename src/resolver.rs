//! Effective-permission resolution.
//!
//! The resolver is a pure function over the role catalog's base matrix and a
//! user record. It holds no state, never mutates its inputs, and is cheap
//! enough to re-run on every read — effective permissions are never cached
//! or persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::grants::{BaseMatrix, GrantMap};
use crate::level::{Level, LevelSet};
use crate::role::RoleId;
use crate::section::Section;

/// Opaque user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> UserId {
        UserId(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<UserId> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|_| Error::BadRequest(format!("Invalid user id: {s}")))
    }
}

impl Default for UserId {
    fn default() -> Self {
        UserId::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A team member as the resolver sees them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Base role. `None` while the user record is still loading — the
    /// resolver treats that as "no access", not as an error.
    pub role: Option<RoleId>,
    /// Per-section exceptions that replace the base role's grants.
    #[serde(default)]
    pub overrides: GrantMap,
}

/// Resolved capabilities for one user across all sections, at one point in
/// time. Owned by the caller; mutating it never touches the base matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effective(BTreeMap<Section, LevelSet>);

impl Effective {
    /// Full access to every known section.
    pub fn full() -> Effective {
        Effective(
            Section::ALL
                .into_iter()
                .map(|section| (section, LevelSet::VIEW_EDIT))
                .collect(),
        )
    }

    /// The capability set for a section. Sections with no entry read as
    /// empty — no access.
    pub fn get(&self, section: Section) -> LevelSet {
        self.0.get(&section).copied().unwrap_or(LevelSet::NONE)
    }

    pub fn can_view(&self, section: Section) -> bool {
        self.get(section).contains(Level::View)
    }

    pub fn can_edit(&self, section: Section) -> bool {
        self.get(section).contains(Level::Edit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, LevelSet)> + '_ {
        self.0.iter().map(|(section, set)| (*section, *set))
    }
}

/// Compute the effective permissions for `user` against `matrix`.
///
/// Resolution order:
/// 1. No role yet (record still loading) — empty mapping. Fail-safe by
///    design: a loading race must never grant access.
/// 2. Administrator — full access to every section, unconditionally. The
///    user's override is not consulted.
/// 3. Otherwise the role's base-matrix entry is copied (an unknown role id
///    reads as an empty entry — the resolver does not guess), then each
///    section present in the user's override replaces the base set wholesale.
///    Replacement, not union: an override can grant beyond the base role or
///    revoke below it.
pub fn resolve_effective(user: &User, matrix: &BaseMatrix) -> Effective {
    let Some(role) = user.role else {
        return Effective::default();
    };

    if role == RoleId::ADMINISTRATOR {
        return Effective::full();
    }

    let mut resolved: BTreeMap<Section, LevelSet> = matrix
        .grants_for(role)
        .map(|grants| grants.iter().collect())
        .unwrap_or_default();

    for (section, set) in user.overrides.iter() {
        resolved.insert(section, set);
    }

    Effective(resolved)
}
