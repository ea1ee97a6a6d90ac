// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory document backed by a JSON model snapshot.
//!
//! Mirrors the host's transactional behaviour: annotations created inside a
//! transaction stay pending until commit and vanish on rollback. Creation
//! calls validate their requests the way the host does (view, line, and
//! reference resolution), and faults can be injected for testing.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::document::{DocumentError, ModelDocument};
use crate::element::Element;
use crate::error::{Error, Result};
use crate::ids::{AnnotationId, ElementId};
use crate::request::{DimensionRequest, PlacementRequest, TextRequest};
use crate::solid::{EdgeRef, Solid};
use crate::view::View;

/// Serializable model snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub view: Option<View>,
    pub elements: Vec<Element>,
    /// Explicit solids per element id.
    #[serde(default)]
    pub solids: FxHashMap<ElementId, Vec<Solid>>,
    /// Give every boxed element without explicit solids a box solid spanning
    /// its bounding box. Rooms and levels are never given solids.
    #[serde(default)]
    pub derive_box_solids: bool,
}

/// An annotation created through the document.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedAnnotation {
    pub id: AnnotationId,
    pub request: PlacementRequest,
}

/// [`ModelDocument`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: FxHashMap<ElementId, Element>,
    order: Vec<ElementId>,
    solids: FxHashMap<ElementId, Vec<Solid>>,
    view: Option<View>,
    committed: Vec<CreatedAnnotation>,
    pending: Vec<CreatedAnnotation>,
    transaction: Option<String>,
    next_annotation: i64,
    rejected_elements: FxHashSet<ElementId>,
    fatal_after: Option<usize>,
    created_in_transaction: usize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a decoded snapshot.
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Result<Self> {
        let mut doc = Self::new();
        doc.view = snapshot.view;
        let mut solids = snapshot.solids;
        for element in snapshot.elements {
            if doc.elements.contains_key(&element.id) {
                return Err(Error::DuplicateElement(element.id));
            }
            if snapshot.derive_box_solids
                && !matches!(element.category, Category::Room | Category::Level)
                && !solids.contains_key(&element.id)
            {
                if let Some(bbox) = &element.bounding_box {
                    solids.insert(element.id, vec![Solid::from_box(bbox)]);
                }
            }
            doc.insert(element);
        }
        doc.solids = solids;
        tracing::debug!(
            elements = doc.order.len(),
            with_solids = doc.solids.len(),
            "Loaded model snapshot"
        );
        Ok(doc)
    }

    /// Decodes a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ModelSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Reads and decodes a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Adds or replaces an element, keeping first-insertion order.
    pub fn insert(&mut self, element: Element) {
        let id = element.id;
        if self.elements.insert(id, element).is_none() {
            self.order.push(id);
        }
    }

    pub fn set_solids(&mut self, id: ElementId, solids: Vec<Solid>) {
        self.solids.insert(id, solids);
    }

    pub fn set_view(&mut self, view: View) {
        self.view = Some(view);
    }

    /// Makes every creation call for `id` fail with a rejection.
    pub fn reject_annotations_for(&mut self, id: ElementId) {
        self.rejected_elements.insert(id);
    }

    /// Makes the creation call after `count` successful ones in a
    /// transaction fail fatally.
    pub fn fail_fatally_after(&mut self, count: usize) {
        self.fatal_after = Some(count);
    }

    /// Committed annotations, in creation order.
    pub fn annotations(&self) -> &[CreatedAnnotation] {
        &self.committed
    }

    /// Annotations created in the open transaction.
    pub fn pending(&self) -> &[CreatedAnnotation] {
        &self.pending
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Committed dimensions attached to `element`.
    pub fn dimensions_for(&self, element: ElementId) -> Vec<&DimensionRequest> {
        self.committed
            .iter()
            .filter_map(|a| match &a.request {
                PlacementRequest::Dimension(d) if d.element == element => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Committed text notes attached to `element`.
    pub fn texts_for(&self, element: ElementId) -> Vec<&TextRequest> {
        self.committed
            .iter()
            .filter_map(|a| match &a.request {
                PlacementRequest::Text(t) if t.element == element => Some(t),
                _ => None,
            })
            .collect()
    }

    fn check_common(&self, view: ElementId, element: ElementId) -> std::result::Result<(), DocumentError> {
        if self.transaction.is_none() {
            return Err(DocumentError::NoTransaction);
        }
        if let Some(limit) = self.fatal_after {
            if self.created_in_transaction >= limit {
                return Err(DocumentError::Fatal(format!(
                    "document refused further modification after {} annotations",
                    limit
                )));
            }
        }
        match &self.view {
            Some(v) if v.id == view => {}
            _ => return Err(DocumentError::Rejected(format!("view {} is not the active view", view))),
        }
        if self.rejected_elements.contains(&element) {
            return Err(DocumentError::Rejected(format!(
                "host rejected annotation for element {}",
                element
            )));
        }
        Ok(())
    }

    fn resolve_reference(&self, reference: &EdgeRef) -> bool {
        self.solids
            .get(&reference.element)
            .and_then(|solids| solids.get(reference.solid))
            .is_some_and(|solid| reference.edge < solid.edges.len())
    }

    fn push_pending(&mut self, request: PlacementRequest) -> AnnotationId {
        self.next_annotation += 1;
        let id = AnnotationId(self.next_annotation);
        self.pending.push(CreatedAnnotation { id, request });
        self.created_in_transaction += 1;
        id
    }
}

impl ModelDocument for MemoryDocument {
    fn collect_elements(&self, categories: &[Category]) -> Vec<ElementId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.elements
                    .get(id)
                    .is_some_and(|e| categories.contains(&e.category))
            })
            .collect()
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    fn solids(&self, id: ElementId) -> Vec<Solid> {
        self.solids.get(&id).cloned().unwrap_or_default()
    }

    fn active_view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    fn begin_transaction(&mut self, name: &str) -> std::result::Result<(), DocumentError> {
        if let Some(open) = &self.transaction {
            return Err(DocumentError::Fatal(format!(
                "transaction '{}' is already open",
                open
            )));
        }
        tracing::debug!(name, "Transaction started");
        self.transaction = Some(name.to_string());
        self.created_in_transaction = 0;
        Ok(())
    }

    fn create_dimension(
        &mut self,
        request: &DimensionRequest,
    ) -> std::result::Result<AnnotationId, DocumentError> {
        self.check_common(request.view, request.element)?;
        if request.line.length() < 1e-9 {
            return Err(DocumentError::Rejected("dimension line is degenerate".into()));
        }
        for reference in request.references() {
            if !self.resolve_reference(reference) {
                return Err(DocumentError::Rejected(format!(
                    "reference {} does not resolve to a solid edge",
                    reference
                )));
            }
        }
        Ok(self.push_pending(PlacementRequest::Dimension(request.clone())))
    }

    fn create_text(&mut self, request: &TextRequest) -> std::result::Result<AnnotationId, DocumentError> {
        self.check_common(request.view, request.element)?;
        if request.text.trim().is_empty() {
            return Err(DocumentError::Rejected("text is empty".into()));
        }
        Ok(self.push_pending(PlacementRequest::Text(request.clone())))
    }

    fn commit_transaction(&mut self) -> std::result::Result<(), DocumentError> {
        let name = self.transaction.take().ok_or(DocumentError::NoTransaction)?;
        tracing::debug!(name = %name, annotations = self.pending.len(), "Transaction committed");
        self.committed.append(&mut self.pending);
        Ok(())
    }

    fn rollback_transaction(&mut self) {
        if let Some(name) = self.transaction.take() {
            tracing::debug!(name = %name, discarded = self.pending.len(), "Transaction rolled back");
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Line3;
    use nalgebra::Point3;

    fn doc_with_wall() -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        doc.set_view(View::south_elevation(100));
        let wall = Element::new(1, Category::Wall).with_bounds([0.0, 0.0, 0.0], [10.0, 1.0, 10.0]);
        let solid = Solid::from_box(wall.bounding_box.as_ref().unwrap());
        doc.insert(wall);
        doc.set_solids(ElementId(1), vec![solid]);
        doc.insert(Element::new(2, Category::Level).with_elevation(0.0));
        doc
    }

    fn dimension(doc_view: i64, a: usize, b: usize) -> DimensionRequest {
        let r = |edge| EdgeRef {
            element: ElementId(1),
            solid: 0,
            edge,
        };
        DimensionRequest::new(
            ElementId(doc_view),
            ElementId(1),
            Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 10.0)),
            r(a),
            r(b),
        )
        .unwrap()
    }

    fn text(content: &str) -> TextRequest {
        TextRequest {
            view: ElementId(100),
            element: ElementId(1),
            position: Point3::origin(),
            text: content.into(),
            leader_end: None,
        }
    }

    #[test]
    fn collect_filters_by_category_in_order() {
        let doc = doc_with_wall();
        assert_eq!(doc.collect_elements(&Category::ALL), vec![ElementId(1), ElementId(2)]);
        assert_eq!(doc.collect_elements(&[Category::Level]), vec![ElementId(2)]);
        assert!(doc.collect_elements(&[Category::Room]).is_empty());
    }

    #[test]
    fn commit_makes_pending_permanent() {
        let mut doc = doc_with_wall();
        doc.begin_transaction("test").unwrap();
        doc.create_dimension(&dimension(100, 0, 4)).unwrap();
        doc.create_text(&text("W1")).unwrap();
        assert_eq!(doc.pending().len(), 2);
        assert!(doc.annotations().is_empty());

        doc.commit_transaction().unwrap();
        assert_eq!(doc.annotations().len(), 2);
        assert_eq!(doc.dimensions_for(ElementId(1)).len(), 1);
        assert_eq!(doc.texts_for(ElementId(1)).len(), 1);
        assert!(!doc.in_transaction());
    }

    #[test]
    fn rollback_discards_pending() {
        let mut doc = doc_with_wall();
        doc.begin_transaction("test").unwrap();
        doc.create_text(&text("W1")).unwrap();
        doc.rollback_transaction();
        assert!(doc.pending().is_empty());
        assert!(doc.annotations().is_empty());
    }

    #[test]
    fn creation_outside_transaction_fails() {
        let mut doc = doc_with_wall();
        assert_eq!(doc.create_text(&text("W1")), Err(DocumentError::NoTransaction));
        assert_eq!(doc.commit_transaction(), Err(DocumentError::NoTransaction));
    }

    #[test]
    fn host_validation_rejects_bad_requests() {
        let mut doc = doc_with_wall();
        doc.begin_transaction("test").unwrap();

        let err = doc.create_dimension(&dimension(999, 0, 4)).unwrap_err();
        assert!(err.is_recoverable());

        let err = doc.create_dimension(&dimension(100, 0, 40)).unwrap_err();
        assert!(matches!(err, DocumentError::Rejected(ref m) if m.contains("does not resolve")));

        let err = doc.create_text(&text("  ")).unwrap_err();
        assert!(err.is_recoverable());

        doc.reject_annotations_for(ElementId(1));
        assert!(doc.create_text(&text("W1")).unwrap_err().is_recoverable());
    }

    #[test]
    fn injected_fatal_failure() {
        let mut doc = doc_with_wall();
        doc.fail_fatally_after(1);
        doc.begin_transaction("test").unwrap();
        doc.create_text(&text("one")).unwrap();
        let err = doc.create_text(&text("two")).unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn nested_transaction_is_fatal() {
        let mut doc = doc_with_wall();
        doc.begin_transaction("outer").unwrap();
        assert!(matches!(doc.begin_transaction("inner"), Err(DocumentError::Fatal(_))));
    }

    #[test]
    fn snapshot_with_derived_box_solids() {
        let json = r#"{
            "view": {"id": 100, "view_type": "Elevation", "right": [1,0,0], "up": [0,0,1], "view_direction": [0,1,0]},
            "derive_box_solids": true,
            "elements": [
                {"id": 1, "category": "Walls", "bounding_box": {"min": [0,0,0], "max": [10,1,10]}},
                {"id": 2, "category": "Rooms", "bounding_box": {"min": [0,0,0], "max": [5,5,3]}},
                {"id": 3, "category": "Generic Models"}
            ]
        }"#;
        let doc = MemoryDocument::from_json(json).unwrap();
        assert_eq!(doc.solids(ElementId(1)).len(), 1);
        assert!(doc.solids(ElementId(2)).is_empty());
        assert!(doc.solids(ElementId(3)).is_empty());
        assert_eq!(doc.active_view().unwrap().id, ElementId(100));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"elements": [
            {"id": 1, "category": "Walls"},
            {"id": 1, "category": "Floors"}
        ]}"#;
        assert!(matches!(
            MemoryDocument::from_json(json),
            Err(Error::DuplicateElement(ElementId(1)))
        ));
    }
}
