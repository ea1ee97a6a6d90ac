// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element categories taking part in graph export and annotation.
//!
//! The set is closed: every pass filters the document to these seven
//! categories, and the planners dispatch on them with an exhaustive `match`.

use serde::{Deserialize, Serialize};

/// Category of a building element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Walls", alias = "Wall")]
    Wall,
    #[serde(rename = "Floors", alias = "Floor")]
    Floor,
    #[serde(rename = "Structural Framing", alias = "StructuralFraming")]
    StructuralFraming,
    #[serde(rename = "Structural Foundations", alias = "StructuralFoundation")]
    StructuralFoundation,
    #[serde(rename = "Generic Models", alias = "GenericModel")]
    GenericModel,
    #[serde(rename = "Rooms", alias = "Room")]
    Room,
    #[serde(rename = "Levels", alias = "Level")]
    Level,
}

impl Category {
    /// The fixed category set collected from the document.
    pub const ALL: [Category; 7] = [
        Category::Wall,
        Category::Floor,
        Category::StructuralFraming,
        Category::StructuralFoundation,
        Category::GenericModel,
        Category::Room,
        Category::Level,
    ];

    /// Returns the host category name (as written to the node table).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wall => "Walls",
            Category::Floor => "Floors",
            Category::StructuralFraming => "Structural Framing",
            Category::StructuralFoundation => "Structural Foundations",
            Category::GenericModel => "Generic Models",
            Category::Room => "Rooms",
            Category::Level => "Levels",
        }
    }

    /// Parses a host category name. Singular spellings are accepted too.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Category::ALL.into_iter().find(|c| {
            c.as_str().eq_ignore_ascii_case(name) || c.singular().eq_ignore_ascii_case(name)
        })
    }

    fn singular(&self) -> &'static str {
        match self {
            Category::Wall => "Wall",
            Category::Floor => "Floor",
            Category::StructuralFraming => "StructuralFraming",
            Category::StructuralFoundation => "StructuralFoundation",
            Category::GenericModel => "GenericModel",
            Category::Room => "Room",
            Category::Level => "Level",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
