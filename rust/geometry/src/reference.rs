// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference-edge extraction.
//!
//! Two modes:
//! - **Horizontal extremes** for extruded elements (walls, floors): one pass
//!   over the edges of the first usable solid, keeping the highest and the
//!   lowest horizontal edge. Comparisons are strict, so at equal elevation the
//!   edge seen first wins. No other tie-break is applied.
//! - **First two edges** for framing and generic models: the first two edges
//!   of the first solid that has faces. No orientation filtering; this is a
//!   best-effort heuristic, not a geometric guarantee.

use annograph_model::{EdgeRef, ElementId, Solid, SolidEdge};

use crate::error::{GeometryError, Result};

/// Maximum endpoint elevation difference of a horizontal edge.
pub const HORIZONTAL_TOLERANCE: f64 = 0.01;

/// A solid edge together with the reference that names it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEdge {
    pub reference: EdgeRef,
    pub edge: SolidEdge,
}

impl ReferenceEdge {
    /// Elevation used for extreme comparisons.
    #[inline]
    pub fn z(&self) -> f64 {
        self.edge.mean_z()
    }
}

/// Topmost and bottommost horizontal edges of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalExtremes {
    pub top: ReferenceEdge,
    pub bottom: ReferenceEdge,
    /// Number of horizontal edges seen on the solid.
    pub horizontal_count: usize,
}

impl HorizontalExtremes {
    /// Vertical distance between the two references.
    pub fn height(&self) -> f64 {
        self.top.z() - self.bottom.z()
    }
}

fn reference_edge(element: ElementId, solid: usize, edge: usize, geometry: SolidEdge) -> ReferenceEdge {
    ReferenceEdge {
        reference: EdgeRef {
            element,
            solid,
            edge,
        },
        edge: geometry,
    }
}

/// Finds the topmost and bottommost horizontal edges of the first solid with
/// positive volume and at least one face.
pub fn horizontal_extremes(
    element: ElementId,
    solids: &[Solid],
    tolerance: f64,
) -> Result<HorizontalExtremes> {
    let (solid_idx, solid) = solids
        .iter()
        .enumerate()
        .find(|(_, s)| s.is_usable())
        .ok_or(GeometryError::NoSolid(element))?;

    let mut top: Option<ReferenceEdge> = None;
    let mut bottom: Option<ReferenceEdge> = None;
    let mut max_z = f64::NEG_INFINITY;
    let mut min_z = f64::INFINITY;
    let mut count = 0usize;

    for (edge_idx, edge) in solid.edges.iter().enumerate() {
        if !edge.is_horizontal(tolerance) {
            continue;
        }
        count += 1;
        let z = edge.mean_z();
        if z > max_z {
            max_z = z;
            top = Some(reference_edge(element, solid_idx, edge_idx, *edge));
        }
        if z < min_z {
            min_z = z;
            bottom = Some(reference_edge(element, solid_idx, edge_idx, *edge));
        }
    }

    match (top, bottom) {
        (Some(top), Some(bottom)) if count >= 2 => {
            if top.reference == bottom.reference {
                return Err(GeometryError::IndistinctReferences(element));
            }
            tracing::trace!(
                element = %element,
                top_z = top.z(),
                bottom_z = bottom.z(),
                horizontal = count,
                "Found horizontal extremes"
            );
            Ok(HorizontalExtremes {
                top,
                bottom,
                horizontal_count: count,
            })
        }
        _ => Err(GeometryError::InsufficientEdges {
            element,
            found: count,
        }),
    }
}

/// Returns the first two edges of the first solid with a non-empty face set.
pub fn first_two_edges(element: ElementId, solids: &[Solid]) -> Result<[ReferenceEdge; 2]> {
    let (solid_idx, solid) = solids
        .iter()
        .enumerate()
        .find(|(_, s)| !s.faces.is_empty())
        .ok_or(GeometryError::NoSolid(element))?;

    match solid.edges.as_slice() {
        [a, b, ..] => Ok([
            reference_edge(element, solid_idx, 0, *a),
            reference_edge(element, solid_idx, 1, *b),
        ]),
        edges => Err(GeometryError::InsufficientEdges {
            element,
            found: edges.len(),
        }),
    }
}
