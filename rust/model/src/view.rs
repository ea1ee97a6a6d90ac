// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing views and their view-local basis.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;

/// Kind of drawing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    FloorPlan,
    CeilingPlan,
    Elevation,
    Section,
    Detail,
    ThreeD,
    Schedule,
    Sheet,
    Legend,
}

impl ViewType {
    /// Views that accept dimension and text annotations.
    pub fn is_annotatable(&self) -> bool {
        matches!(
            self,
            ViewType::Elevation | ViewType::FloorPlan | ViewType::Section | ViewType::Detail
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::FloorPlan => "FloorPlan",
            ViewType::CeilingPlan => "CeilingPlan",
            ViewType::Elevation => "Elevation",
            ViewType::Section => "Section",
            ViewType::Detail => "Detail",
            ViewType::ThreeD => "ThreeD",
            ViewType::Schedule => "Schedule",
            ViewType::Sheet => "Sheet",
            ViewType::Legend => "Legend",
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drawing view with its right/up/view-direction basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    pub view_type: ViewType,
    pub right: Vector3<f64>,
    pub up: Vector3<f64>,
    pub view_direction: Vector3<f64>,
}

impl View {
    pub fn new(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        view_type: ViewType,
        right: Vector3<f64>,
        up: Vector3<f64>,
        view_direction: Vector3<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            view_type,
            right,
            up,
            view_direction,
        }
    }

    /// South elevation: looking along +Y, right = +X, up = +Z.
    pub fn south_elevation(id: impl Into<ElementId>) -> Self {
        Self::new(
            id,
            "South",
            ViewType::Elevation,
            Vector3::x(),
            Vector3::z(),
            Vector3::y(),
        )
    }
}
