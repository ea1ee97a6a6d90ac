// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement planning: turns a node into a dimension or text request.
//!
//! Planning only reads the document. The orchestrator submits the resulting
//! request inside its transaction.
//!
//! Dimensions:
//! - **Wall**: span of `±wall_span_factor × height` along view-up, offset
//!   along view-right from the centerline midpoint.
//! - **Floor**: span of `±floor_span_factor × thickness`, offset from the
//!   bounding-box center.
//! - **Structural framing / generic model**: first two solid edges, line
//!   along the element direction at a fixed (right, up) offset.
//! - Rooms, levels and foundations have no dimension planner.
//!
//! Text goes above the element, except rooms (next to the boundary) and
//! levels (beside the elevation point, with a leader).

use annograph_geometry::{first_two_edges, horizontal_extremes, ViewFrame};
use annograph_graph::Node;
use annograph_model::{
    AnnotationId, AnnotationKind, Category, DimensionRequest, DocumentError, Element, ElementId,
    Line3, ModelDocument, PlacementRequest, TextRequest, View,
};
use nalgebra::Point3;

use crate::config::PlacementConfig;
use crate::content::text_content;
use crate::error::PlacementError;

type PlanResult = Result<Plan, PlacementError>;

/// A planned annotation and a human-readable summary of where it goes.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub request: PlacementRequest,
    pub summary: String,
}

/// View and constants shared by every placement in a pass.
#[derive(Debug, Clone)]
pub struct PlacementContext {
    pub view: ElementId,
    pub frame: ViewFrame,
    pub config: PlacementConfig,
}

impl PlacementContext {
    /// Context for `view`. Fails when the view basis is degenerate.
    pub fn for_view(
        view: &View,
        config: PlacementConfig,
    ) -> Result<Self, annograph_geometry::GeometryError> {
        Ok(Self {
            view: view.id,
            frame: ViewFrame::from_view(view)?,
            config,
        })
    }

    /// Plans one annotation of `kind` for `node`.
    pub fn plan<D: ModelDocument + ?Sized>(
        &self,
        doc: &D,
        node: &Node,
        kind: AnnotationKind,
    ) -> PlanResult {
        match kind {
            AnnotationKind::Dimension => self.plan_dimension(doc, node),
            AnnotationKind::Text => self.plan_text(doc, node),
        }
    }

    pub fn plan_dimension<D: ModelDocument + ?Sized>(&self, doc: &D, node: &Node) -> PlanResult {
        match node.category {
            Category::Wall => self.wall_height(doc, node),
            Category::Floor => self.floor_thickness(doc, node),
            Category::StructuralFraming => {
                self.edge_pair_dimension(doc, node, self.config.framing_offset)
            }
            Category::GenericModel => {
                self.edge_pair_dimension(doc, node, self.config.generic_offset)
            }
            Category::Room | Category::Level | Category::StructuralFoundation => {
                Err(PlacementError::Unsupported {
                    category: node.category,
                    kind: AnnotationKind::Dimension,
                })
            }
        }
    }

    pub fn plan_text<D: ModelDocument + ?Sized>(&self, doc: &D, node: &Node) -> PlanResult {
        let text = text_content(node, &self.config)?;
        match node.category {
            Category::Room => self.room_text(doc, node, text),
            Category::Level => Ok(self.level_text(node, text)),
            _ => self.element_text(doc, node, text),
        }
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    fn wall_height<D: ModelDocument + ?Sized>(&self, doc: &D, node: &Node) -> PlanResult {
        let element = element(doc, node.id)?;
        let solids = doc.solids(node.id);
        let extremes = horizontal_extremes(node.id, &solids, self.config.horizontal_tolerance)?;

        let anchor = centerline_midpoint(element)
            .or_else(|| node.center())
            .ok_or_else(|| no_anchor(node.id))?;
        let offset = self
            .config
            .wall_min_offset
            .max(diagonal(node) * self.config.wall_offset_factor);
        let center = self.frame.offset(anchor, offset, 0.0);

        let height = extremes.height();
        let (start, end) = self
            .frame
            .span_up(center, self.config.wall_span_factor * height);

        let request = self.dimension(
            node,
            Line3::new(start, end),
            extremes.top.reference,
            extremes.bottom.reference,
        )?;
        Ok(Plan {
            request,
            summary: format!(
                "wall height {} mm at {}",
                self.config.to_mm(height),
                fmt_point(&center)
            ),
        })
    }

    fn floor_thickness<D: ModelDocument + ?Sized>(&self, doc: &D, node: &Node) -> PlanResult {
        element(doc, node.id)?;
        let solids = doc.solids(node.id);
        let extremes = horizontal_extremes(node.id, &solids, self.config.horizontal_tolerance)?;

        let anchor = node.center().ok_or_else(|| no_anchor(node.id))?;
        let offset = self
            .config
            .floor_min_offset
            .max(diagonal(node) * self.config.floor_offset_factor);
        let center = self.frame.offset(anchor, offset, 0.0);

        let thickness = if node.thickness > 0.0 {
            node.thickness
        } else {
            extremes.height()
        };
        let (start, end) = self
            .frame
            .span_up(center, self.config.floor_span_factor * thickness);

        let request = self.dimension(
            node,
            Line3::new(start, end),
            extremes.top.reference,
            extremes.bottom.reference,
        )?;
        Ok(Plan {
            request,
            summary: format!(
                "floor thickness {} mm at {}",
                self.config.to_mm(thickness),
                fmt_point(&center)
            ),
        })
    }

    /// Framing and generic models: the first two edges, no orientation check.
    fn edge_pair_dimension<D: ModelDocument + ?Sized>(
        &self,
        doc: &D,
        node: &Node,
        (right, up): (f64, f64),
    ) -> PlanResult {
        let element = element(doc, node.id)?;
        let solids = doc.solids(node.id);
        let [first, second] = first_two_edges(node.id, &solids)?;

        let anchor = match node.category {
            Category::StructuralFraming => location_point(element).or_else(|| node.center()),
            _ => node.center().or_else(|| location_point(element)),
        }
        .ok_or_else(|| no_anchor(node.id))?;
        let center = self.frame.offset(anchor, right, up);

        let direction = element
            .location
            .as_ref()
            .and_then(|loc| loc.as_curve())
            .and_then(|curve| curve.direction())
            .map(|d| self.frame.in_plane(d))
            .unwrap_or_else(|| self.frame.right());
        let half = self
            .config
            .line_min_half
            .max(diagonal(node) * self.config.line_half_factor);
        let (start, end) = self.frame.span_along(center, direction, half);

        let measured = (second.edge.midpoint() - first.edge.midpoint()).norm();
        let request = self.dimension(node, Line3::new(start, end), first.reference, second.reference)?;
        Ok(Plan {
            request,
            summary: format!(
                "{} dimension {} mm at {}",
                node.category,
                self.config.to_mm(measured),
                fmt_point(&center)
            ),
        })
    }

    fn dimension(
        &self,
        node: &Node,
        line: Line3,
        first: annograph_model::EdgeRef,
        second: annograph_model::EdgeRef,
    ) -> Result<PlacementRequest, PlacementError> {
        DimensionRequest::new(self.view, node.id, line, first, second)
            .map(PlacementRequest::Dimension)
            .ok_or_else(|| {
                PlacementError::ReferenceInsufficient(format!(
                    "element {} has only one distinct reference",
                    node.id
                ))
            })
    }

    // =========================================================================
    // Text
    // =========================================================================

    fn room_text<D: ModelDocument + ?Sized>(
        &self,
        doc: &D,
        node: &Node,
        text: String,
    ) -> PlanResult {
        let element = element(doc, node.id)?;
        let anchor = element
            .room
            .as_ref()
            .and_then(|room| room.boundary.first())
            .and_then(|outer| outer.first())
            .map(|segment| segment.midpoint())
            .ok_or_else(|| {
                PlacementError::GeometryUnavailable(format!("room {} has no boundary", node.id))
            })?;
        let (right, up) = self.config.room_text_offset;
        let position = self.frame.offset(anchor, right, up);
        Ok(self.text(node, position, text, None))
    }

    fn level_text(&self, node: &Node, text: String) -> Plan {
        let (x, y) = node.center().map_or((0.0, 0.0), |c| (c.x, c.y));
        let point = Point3::new(x, y, node.level_elevation);
        let (right, up) = self.config.level_text_offset;
        let position = self.frame.offset(point, right, up);
        let leader = self.frame.offset(point, self.config.level_leader, 0.0);
        self.text(node, position, text, Some(leader))
    }

    fn element_text<D: ModelDocument + ?Sized>(
        &self,
        doc: &D,
        node: &Node,
        text: String,
    ) -> PlanResult {
        let anchor = match node.center() {
            Some(c) => c,
            None => location_point(element(doc, node.id)?).ok_or_else(|| no_anchor(node.id))?,
        };
        let position = self.frame.offset(anchor, 0.0, self.config.text_up);
        Ok(self.text(node, position, text, None))
    }

    fn text(
        &self,
        node: &Node,
        position: Point3<f64>,
        text: String,
        leader_end: Option<Point3<f64>>,
    ) -> Plan {
        let summary = format!(
            "text \"{}\" at {}",
            text.lines().next().unwrap_or_default(),
            fmt_point(&position)
        );
        Plan {
            request: PlacementRequest::Text(TextRequest {
                view: self.view,
                element: node.id,
                position,
                text,
                leader_end,
            }),
            summary,
        }
    }
}

/// Submits a planned request to the document.
pub fn submit<D: ModelDocument + ?Sized>(
    doc: &mut D,
    plan: &Plan,
) -> Result<AnnotationId, DocumentError> {
    match &plan.request {
        PlacementRequest::Dimension(request) => doc.create_dimension(request),
        PlacementRequest::Text(request) => doc.create_text(request),
    }
}

fn element<D: ModelDocument + ?Sized>(doc: &D, id: ElementId) -> Result<&Element, PlacementError> {
    doc.element(id)
        .ok_or_else(|| PlacementError::GeometryUnavailable(format!("element {} is not in the document", id)))
}

fn no_anchor(id: ElementId) -> PlacementError {
    PlacementError::GeometryUnavailable(format!("element {} has no location or bounding box", id))
}

fn diagonal(node: &Node) -> f64 {
    node.bounding_box.as_ref().map_or(0.0, |b| b.diagonal())
}

/// Midpoint of the location curve's endpoints.
fn centerline_midpoint(element: &Element) -> Option<Point3<f64>> {
    let curve = element.location.as_ref()?.as_curve()?;
    Some(nalgebra::center(&curve.start(), &curve.end()))
}

fn location_point(element: &Element) -> Option<Point3<f64>> {
    element.location.as_ref().map(|loc| loc.anchor())
}

fn fmt_point(p: &Point3<f64>) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}
