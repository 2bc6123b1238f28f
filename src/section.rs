//! Application sections subject to access control.
//!
//! Sections are a closed enumeration — the permission matrix is never keyed
//! by free-form strings, so a typo in a section name is a compile error
//! rather than a silently empty permission set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A fixed application area subject to access control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Roster,
    Events,
    /// Detail pages of a single event. Valid matrix key, but access to it is
    /// controlled structurally by the event itself, so it is hidden from the
    /// permission-editing UI.
    EventDetail,
    Planning,
    Scouting,
    Performance,
    Stocks,
    Equipment,
    Financial,
    Documents,
    Users,
    Settings,
}

/// Display grouping for the permission UI. Presentation metadata only — the
/// resolver never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Piloting,
    MySpace,
    GeneralData,
    Logistics,
    Application,
    Other,
}

impl Section {
    /// Every known section, in display order.
    pub const ALL: [Section; 12] = [
        Section::Planning,
        Section::Scouting,
        Section::Performance,
        Section::Roster,
        Section::Events,
        Section::EventDetail,
        Section::Stocks,
        Section::Equipment,
        Section::Documents,
        Section::Users,
        Section::Settings,
        Section::Financial,
    ];

    /// The display category this section is grouped under.
    pub fn category(self) -> Category {
        match self {
            Section::Planning | Section::Scouting | Section::Performance => Category::Piloting,
            Section::Roster | Section::Events | Section::EventDetail => Category::GeneralData,
            Section::Stocks | Section::Equipment => Category::Logistics,
            Section::Documents => Category::MySpace,
            Section::Users | Section::Settings => Category::Application,
            Section::Financial => Category::Other,
        }
    }

    /// Whether the section appears in the permission-editing UI.
    pub fn in_permission_ui(self) -> bool {
        !matches!(self, Section::EventDetail)
    }

    /// Kebab-case identifier, matching the wire format.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Roster => "roster",
            Section::Events => "events",
            Section::EventDetail => "event-detail",
            Section::Planning => "planning",
            Section::Scouting => "scouting",
            Section::Performance => "performance",
            Section::Stocks => "stocks",
            Section::Equipment => "equipment",
            Section::Financial => "financial",
            Section::Documents => "documents",
            Section::Users => "users",
            Section::Settings => "settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| crate::Error::BadRequest(format!("Unknown section: {s}")))
    }
}
