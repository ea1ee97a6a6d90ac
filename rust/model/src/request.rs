// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement requests sent to the document during an annotation pass.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::ids::ElementId;
use crate::solid::EdgeRef;

/// Kind of annotation a request creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Dimension,
    Text,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Dimension => "dimension",
            AnnotationKind::Text => "text",
        }
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded 3D line a dimension is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line3 {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Dimension between exactly two distinct solid-edge references.
///
/// Only serialized; requests are built through [`DimensionRequest::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRequest {
    pub view: ElementId,
    pub element: ElementId,
    pub line: Line3,
    references: [EdgeRef; 2],
}

impl DimensionRequest {
    /// Returns `None` when both references name the same edge.
    pub fn new(
        view: ElementId,
        element: ElementId,
        line: Line3,
        first: EdgeRef,
        second: EdgeRef,
    ) -> Option<Self> {
        if first == second {
            return None;
        }
        Some(Self {
            view,
            element,
            line,
            references: [first, second],
        })
    }

    pub fn references(&self) -> &[EdgeRef; 2] {
        &self.references
    }
}

/// Text note, optionally with a leader ending at `leader_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRequest {
    pub view: ElementId,
    pub element: ElementId,
    pub position: Point3<f64>,
    pub text: String,
    pub leader_end: Option<Point3<f64>>,
}

/// A transient placement request built by a planner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementRequest {
    Dimension(DimensionRequest),
    Text(TextRequest),
}

impl PlacementRequest {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            PlacementRequest::Dimension(_) => AnnotationKind::Dimension,
            PlacementRequest::Text(_) => AnnotationKind::Text,
        }
    }

    /// Source element the annotation belongs to.
    pub fn element(&self) -> ElementId {
        match self {
            PlacementRequest::Dimension(d) => d.element,
            PlacementRequest::Text(t) => t.element,
        }
    }
}
