//! Sparse section-to-capability maps and the base permission matrix.
//!
//! [`GrantMap`] is used in two places with different sparsity semantics:
//!
//! - as a role's base-matrix entry, where an absent section means "no access";
//! - as a user's override, where an absent section means "inherit the base
//!   matrix" and a present-but-empty entry means "explicitly no access".
//!
//! Mutations are functional: they return a new map and leave the receiver
//! untouched, so UI components holding a reference to shared configuration
//! never observe a half-applied toggle.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::level::{Level, LevelSet};
use crate::role::RoleId;
use crate::section::Section;

/// Sparse mapping from section to capability set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantMap(BTreeMap<Section, LevelSet>);

impl GrantMap {
    pub fn new() -> GrantMap {
        GrantMap::default()
    }

    /// The capability set for a section. Absent sections read as empty.
    pub fn get(&self, section: Section) -> LevelSet {
        self.0.get(&section).copied().unwrap_or(LevelSet::NONE)
    }

    /// Whether the map carries an explicit entry for the section. For an
    /// override this is the difference between "inherit" and "no access".
    pub fn contains(&self, section: Section) -> bool {
        self.0.contains_key(&section)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, LevelSet)> + '_ {
        self.0.iter().map(|(section, set)| (*section, *set))
    }

    /// Apply a view/edit checkbox toggle, returning the updated map.
    ///
    /// The targeted section ends up with an explicit entry even when the
    /// toggle empties it — for an override, "all checkboxes off" must persist
    /// as an explicit revocation rather than fall back to inheriting.
    #[must_use]
    pub fn with_level(&self, section: Section, level: Level, enabled: bool) -> GrantMap {
        let mut next = self.clone();
        let set = next.0.entry(section).or_insert(LevelSet::NONE);
        *set = set.set(level, enabled);
        next
    }

    /// Drop the explicit entry for a section, returning the updated map.
    /// For an override this restores inheritance of the base matrix.
    #[must_use]
    pub fn without(&self, section: Section) -> GrantMap {
        let mut next = self.clone();
        next.0.remove(&section);
        next
    }

    pub(crate) fn insert(&mut self, section: Section, set: LevelSet) {
        self.0.insert(section, set);
    }
}

impl FromIterator<(Section, LevelSet)> for GrantMap {
    fn from_iter<I: IntoIterator<Item = (Section, LevelSet)>>(iter: I) -> GrantMap {
        GrantMap(iter.into_iter().collect())
    }
}

/// The shared default configuration: role id to per-section grants.
///
/// Sparse — a role with no entry has no access anywhere. Owned by
/// [`crate::store::AccessStore`]; the resolver only ever reads it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseMatrix(HashMap<RoleId, GrantMap>);

impl BaseMatrix {
    pub fn new() -> BaseMatrix {
        BaseMatrix::default()
    }

    /// The grants for a role, if the matrix has an entry for it.
    pub fn grants_for(&self, role: RoleId) -> Option<&GrantMap> {
        self.0.get(&role)
    }

    /// Create an explicit empty entry for a freshly created role, so UI
    /// iteration over the matrix sees the role without null-checks.
    pub(crate) fn insert_empty(&mut self, role: RoleId) {
        self.0.entry(role).or_default();
    }

    pub(crate) fn set(&mut self, role: RoleId, grants: GrantMap) {
        self.0.insert(role, grants);
    }

    pub(crate) fn remove(&mut self, role: RoleId) {
        self.0.remove(&role);
    }
}
