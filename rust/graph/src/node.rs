// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node records and the per-category attribute rules.

use annograph_model::{BoundingBox, Category, Element, ElementId, ModelDocument};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Placeholder for an absent family or type name.
pub const UNKNOWN: &str = "Unknown";

/// Parameter names read by the attribute rules, in lookup order.
pub mod param_names {
    pub const WALL_LENGTH: &[&str] = &["Length"];
    pub const WALL_HEIGHT: &[&str] = &["Unconnected Height"];
    pub const WALL_THICKNESS: &[&str] = &["Width"];
    pub const FLOOR_THICKNESS: &[&str] = &["Default Thickness", "Thickness"];
    pub const AREA: &[&str] = &["Area"];
    pub const FRAMING_LENGTH: &[&str] = &["Length", "Cut Length"];
    pub const FRAMING_WIDTH: &[&str] = &["b", "Width"];
    pub const FRAMING_DEPTH: &[&str] = &["h", "Depth"];
    pub const ROOM_HEIGHT: &[&str] = &["Unbounded Height"];
    pub const ROOM_NAME: &str = "Name";
    pub const ROOM_NUMBER: &str = "Number";
    pub const ELEVATION: &[&str] = &["Elevation"];
}

/// Graph vertex for one element.
///
/// Scalars that do not apply to the category, or whose parameter is missing,
/// are 0. Lengths are in the native unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub category: Category,
    pub family: String,
    pub type_name: String,
    pub level_id: Option<ElementId>,
    pub host_id: Option<ElementId>,
    pub bounding_box: Option<BoundingBox>,
    pub length: f64,
    pub height: f64,
    pub thickness: f64,
    pub area: f64,
    pub width: f64,
    pub depth: f64,
    /// Unit direction of a straight location line.
    pub direction: Option<Vector3<f64>>,
    pub room_name: String,
    pub room_number: String,
    pub level_elevation: f64,
}

impl Node {
    /// A node with identity only; every derived attribute at its default.
    pub fn bare(id: ElementId, category: Category) -> Self {
        Self {
            id,
            category,
            family: UNKNOWN.to_string(),
            type_name: UNKNOWN.to_string(),
            level_id: None,
            host_id: None,
            bounding_box: None,
            length: 0.0,
            height: 0.0,
            thickness: 0.0,
            area: 0.0,
            width: 0.0,
            depth: 0.0,
            direction: None,
            room_name: String::new(),
            room_number: String::new(),
            level_elevation: 0.0,
        }
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Option<Point3<f64>> {
        self.bounding_box.as_ref().map(BoundingBox::center)
    }
}

/// Which elements become nodes.
#[derive(Debug, Clone)]
pub struct ExportFilter {
    pub categories: Vec<Category>,
    /// Id whitelist; `None` admits every id.
    pub ids: Option<FxHashSet<ElementId>>,
}

impl Default for ExportFilter {
    fn default() -> Self {
        Self {
            categories: Category::ALL.to_vec(),
            ids: None,
        }
    }
}

impl ExportFilter {
    pub fn with_ids<I: IntoIterator<Item = ElementId>>(mut self, ids: I) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }

    pub fn admits(&self, element: &Element) -> bool {
        self.categories.contains(&element.category)
            && self.ids.as_ref().map_or(true, |ids| ids.contains(&element.id))
    }
}

/// Builds nodes from a document.
pub struct NodeBuilder<'a, D: ModelDocument + ?Sized> {
    doc: &'a D,
}

impl<'a, D: ModelDocument + ?Sized> NodeBuilder<'a, D> {
    pub fn new(doc: &'a D) -> Self {
        Self { doc }
    }

    /// Builds the node for `id`.
    pub fn build(&self, id: ElementId) -> Result<Node, NodeError> {
        let element = self.doc.element(id).ok_or(NodeError::MissingElement(id))?;
        self.build_from(element)
    }

    /// Builds the node for an element record already in hand.
    pub fn build_from(&self, element: &Element) -> Result<Node, NodeError> {
        if let Some(bbox) = &element.bounding_box {
            if !bbox.is_finite() {
                return Err(NodeError::NonFiniteBounds(element.id));
            }
        }

        let mut node = Node::bare(element.id, element.category);
        node.family = non_empty_or_unknown(element.family.as_deref());
        node.type_name = non_empty_or_unknown(element.type_name.as_deref());
        node.level_id = element.level_id;
        node.host_id = element.host_id;
        node.bounding_box = element.bounding_box;

        match element.category {
            Category::Wall => wall_attributes(element, &mut node),
            Category::Floor => floor_attributes(element, &mut node),
            Category::StructuralFraming => framing_attributes(element, &mut node),
            Category::Room => room_attributes(element, &mut node),
            Category::Level => level_attributes(element, &mut node),
            Category::StructuralFoundation | Category::GenericModel => {}
        }

        if element.category != Category::Level {
            node.level_elevation = element
                .level_id
                .and_then(|level| self.doc.element(level))
                .map(level_elevation)
                .unwrap_or(0.0);
        }

        Ok(node)
    }
}

fn non_empty_or_unknown(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn lookup(element: &Element, names: &[&str]) -> f64 {
    element.lookup_first_f64(names).unwrap_or(0.0)
}

fn wall_attributes(element: &Element, node: &mut Node) {
    node.length = lookup(element, param_names::WALL_LENGTH);
    node.height = lookup(element, param_names::WALL_HEIGHT);
    node.thickness = lookup(element, param_names::WALL_THICKNESS);
    node.direction = element
        .location
        .as_ref()
        .and_then(|loc| loc.as_curve())
        .and_then(|curve| curve.direction());
}

fn floor_attributes(element: &Element, node: &mut Node) {
    node.thickness = lookup(element, param_names::FLOOR_THICKNESS);
    node.area = lookup(element, param_names::AREA);
}

fn framing_attributes(element: &Element, node: &mut Node) {
    node.length = lookup(element, param_names::FRAMING_LENGTH);
    node.width = lookup(element, param_names::FRAMING_WIDTH);
    node.depth = lookup(element, param_names::FRAMING_DEPTH);
    node.direction = element
        .location
        .as_ref()
        .and_then(|loc| loc.as_curve())
        .and_then(|curve| curve.direction());
}

fn room_attributes(element: &Element, node: &mut Node) {
    let room = element.room.as_ref();
    node.room_name = room
        .and_then(|r| r.name.clone())
        .or_else(|| element.parameters.get_str(param_names::ROOM_NAME).map(String::from))
        .unwrap_or_default();
    node.room_number = room
        .and_then(|r| r.number.clone())
        .or_else(|| element.parameters.get_str(param_names::ROOM_NUMBER).map(String::from))
        .unwrap_or_default();
    node.area = lookup(element, param_names::AREA);
    node.height = lookup(element, param_names::ROOM_HEIGHT);
}

fn level_attributes(element: &Element, node: &mut Node) {
    node.level_elevation = level_elevation(element);
}

fn level_elevation(level: &Element) -> f64 {
    level
        .level
        .map(|l| l.elevation)
        .or_else(|| level.lookup_first_f64(param_names::ELEVATION))
        .unwrap_or(0.0)
}

/// Nodes of one export pass plus the elements that were skipped.
#[derive(Debug, Default)]
pub struct NodeSet {
    pub nodes: Vec<Node>,
    pub skipped: Vec<(ElementId, NodeError)>,
}

/// Collects the filtered elements of `doc` and builds one node each.
///
/// Failures are isolated: the element is logged, recorded in
/// [`NodeSet::skipped`], and the pass continues.
pub fn build_nodes<D: ModelDocument + ?Sized>(doc: &D, filter: &ExportFilter) -> NodeSet {
    let builder = NodeBuilder::new(doc);
    let mut set = NodeSet::default();

    for id in doc.collect_elements(&filter.categories) {
        let element = match doc.element(id) {
            Some(e) => e,
            None => {
                tracing::warn!(id = %id, "Collected element vanished from document");
                set.skipped.push((id, NodeError::MissingElement(id)));
                continue;
            }
        };
        if !filter.admits(element) {
            continue;
        }
        match builder.build_from(element) {
            Ok(node) => set.nodes.push(node),
            Err(e) => {
                tracing::warn!(id = %id, category = %element.category, error = %e, "Skipping element");
                set.skipped.push((id, e));
            }
        }
    }

    tracing::info!(
        nodes = set.nodes.len(),
        skipped = set.skipped.len(),
        "Built node set"
    );
    set
}
