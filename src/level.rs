//! Permission levels and per-section capability sets.
//!
//! A section is either viewable, editable, or inaccessible. Editing implies
//! viewing: every mutation on [`LevelSet`] preserves `edit ⟹ view`, so a set
//! containing `edit` always contains `view` as well.

use serde::{Deserialize, Serialize};

/// A single permission level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Read-only access.
    View,
    /// Content editing access. Implies [`Level::View`].
    Edit,
}

/// The capability set for one section.
///
/// Wire format is a list of levels (`["view", "edit"]`); deserialization
/// normalizes the set so an input of `["edit"]` comes out as view + edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelSet {
    view: bool,
    edit: bool,
}

impl LevelSet {
    /// No access.
    pub const NONE: LevelSet = LevelSet {
        view: false,
        edit: false,
    };

    /// View-only access.
    pub const VIEW: LevelSet = LevelSet {
        view: true,
        edit: false,
    };

    /// Full access.
    pub const VIEW_EDIT: LevelSet = LevelSet {
        view: true,
        edit: true,
    };

    /// Whether the set contains the given level.
    pub fn contains(self, level: Level) -> bool {
        match level {
            Level::View => self.view,
            Level::Edit => self.edit,
        }
    }

    /// Whether the set grants no access at all.
    pub fn is_empty(self) -> bool {
        !self.view && !self.edit
    }

    /// Add a level, cascading up: granting `edit` also grants `view`.
    pub fn grant(self, level: Level) -> LevelSet {
        match level {
            Level::View => LevelSet { view: true, ..self },
            Level::Edit => LevelSet::VIEW_EDIT,
        }
    }

    /// Remove a level, cascading down: revoking `view` also revokes `edit`
    /// (you cannot edit what you cannot view).
    pub fn revoke(self, level: Level) -> LevelSet {
        match level {
            Level::View => LevelSet::NONE,
            Level::Edit => LevelSet { edit: false, ..self },
        }
    }

    /// Apply a checkbox toggle: grant when `enabled`, revoke otherwise.
    pub fn set(self, level: Level, enabled: bool) -> LevelSet {
        if enabled {
            self.grant(level)
        } else {
            self.revoke(level)
        }
    }

    /// The levels present in the set, in ascending order.
    pub fn levels(self) -> impl Iterator<Item = Level> {
        [
            self.view.then_some(Level::View),
            self.edit.then_some(Level::Edit),
        ]
        .into_iter()
        .flatten()
    }
}

impl From<Vec<Level>> for LevelSet {
    fn from(levels: Vec<Level>) -> Self {
        levels
            .into_iter()
            .fold(LevelSet::NONE, |set, level| set.grant(level))
    }
}

impl From<LevelSet> for Vec<Level> {
    fn from(set: LevelSet) -> Self {
        set.levels().collect()
    }
}
