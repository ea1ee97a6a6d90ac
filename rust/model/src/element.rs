// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element records read from the host document.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::category::Category;
use crate::ids::ElementId;
use crate::location::{Curve, Location};
use crate::params::{ParamValue, Parameters};

/// Room-specific data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    /// Boundary loops, each an ordered list of segments. The first loop is
    /// the outer boundary.
    #[serde(default)]
    pub boundary: Vec<Vec<Curve>>,
}

/// Level-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub elevation: f64,
}

/// A building element as exposed by the document.
///
/// Solid geometry is not stored here; it is fetched on demand through
/// [`crate::ModelDocument::solids`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub category: Category,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub level_id: Option<ElementId>,
    #[serde(default)]
    pub host_id: Option<ElementId>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub type_parameters: Parameters,
    #[serde(default)]
    pub room: Option<RoomData>,
    #[serde(default)]
    pub level: Option<LevelData>,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            family: None,
            type_name: None,
            level_id: None,
            host_id: None,
            bounding_box: None,
            location: None,
            parameters: Parameters::new(),
            type_parameters: Parameters::new(),
            room: None,
            level: None,
        }
    }

    pub fn with_names(mut self, family: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_bounds(mut self, min: [f64; 3], max: [f64; 3]) -> Self {
        self.bounding_box = Some(BoundingBox::from_coords(min, max));
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_level(mut self, level: impl Into<ElementId>) -> Self {
        self.level_id = Some(level.into());
        self
    }

    pub fn with_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub fn with_type_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.type_parameters.insert(name, value);
        self
    }

    pub fn with_room(mut self, room: RoomData) -> Self {
        self.room = Some(room);
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.level = Some(LevelData { elevation });
        self
    }

    /// Numeric parameter looked up on the instance first, then on the type.
    pub fn lookup_f64(&self, name: &str) -> Option<f64> {
        self.parameters
            .get_f64(name)
            .or_else(|| self.type_parameters.get_f64(name))
    }

    /// First numeric parameter among `names` (instance, then type, per name).
    pub fn lookup_first_f64(&self, names: &[&str]) -> Option<f64> {
        names.iter().find_map(|n| self.lookup_f64(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_parameters_shadow_type_parameters() {
        let wall = Element::new(1, Category::Wall)
            .with_param("Width", 0.5)
            .with_type_param("Width", 0.8)
            .with_type_param("Function", "Exterior");
        assert_eq!(wall.lookup_f64("Width"), Some(0.5));
        assert_eq!(wall.lookup_f64("Function"), None);
        assert_eq!(wall.lookup_first_f64(&["Missing", "Width"]), Some(0.5));
    }

    #[test]
    fn minimal_json_element() {
        let e: Element = serde_json::from_str(
            r#"{"id": 7, "category": "Walls", "type": "Generic - 200mm", "level_id": 3}"#,
        )
        .unwrap();
        assert_eq!(e.id, ElementId(7));
        assert_eq!(e.category, Category::Wall);
        assert_eq!(e.type_name.as_deref(), Some("Generic - 200mm"));
        assert_eq!(e.level_id, Some(ElementId(3)));
        assert!(e.bounding_box.is_none());
        assert!(e.parameters.is_empty());
    }
}
