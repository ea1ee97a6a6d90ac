// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid geometry as exposed by the host: faces and straight edges.
//!
//! Only what the reference-edge analysis needs is modelled. Faces keep their
//! area and the indices of their bounding edges; edges keep their endpoints.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bounds::BoundingBox;
use crate::ids::ElementId;

/// Straight edge of a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidEdge {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl SolidEdge {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Mean elevation of the two endpoints.
    #[inline]
    pub fn mean_z(&self) -> f64 {
        (self.start.z + self.end.z) * 0.5
    }

    /// An edge is horizontal when its endpoint elevations differ by less than
    /// `tolerance`.
    #[inline]
    pub fn is_horizontal(&self, tolerance: f64) -> bool {
        (self.start.z - self.end.z).abs() < tolerance
    }
}

/// Planar face of a solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub area: f64,
    /// Indices into [`Solid::edges`] of the face's outer loop.
    #[serde(default)]
    pub edges: SmallVec<[usize; 4]>,
}

/// Closed solid belonging to one element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solid {
    pub volume: f64,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub edges: Vec<SolidEdge>,
}

impl Solid {
    /// True when the solid encloses volume and has at least one face.
    pub fn is_usable(&self) -> bool {
        self.volume > 0.0 && !self.faces.is_empty()
    }

    /// Builds the 12-edge, 6-face box solid spanning `bbox`.
    ///
    /// Edge order: the four bottom edges, the four top edges, then the four
    /// vertical edges.
    pub fn from_box(bbox: &BoundingBox) -> Self {
        let (lo, hi) = (bbox.min, bbox.max);
        let corner = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let ring = |z: f64| {
            [
                corner(lo.x, lo.y, z),
                corner(hi.x, lo.y, z),
                corner(hi.x, hi.y, z),
                corner(lo.x, hi.y, z),
            ]
        };
        let bottom = ring(lo.z);
        let top = ring(hi.z);

        let mut edges = Vec::with_capacity(12);
        for loop_pts in [&bottom, &top] {
            for i in 0..4 {
                edges.push(SolidEdge::new(loop_pts[i], loop_pts[(i + 1) % 4]));
            }
        }
        for i in 0..4 {
            edges.push(SolidEdge::new(bottom[i], top[i]));
        }

        let size = bbox.size();
        let face = |area: f64, idx: [usize; 4]| Face {
            area,
            edges: SmallVec::from_slice(&idx),
        };
        let faces = vec![
            face(size.x * size.y, [0, 1, 2, 3]),
            face(size.x * size.y, [4, 5, 6, 7]),
            face(size.x * size.z, [0, 9, 4, 8]),
            face(size.y * size.z, [1, 10, 5, 9]),
            face(size.x * size.z, [2, 11, 6, 10]),
            face(size.y * size.z, [3, 8, 7, 11]),
        ];

        Self {
            volume: size.x * size.y * size.z,
            faces,
            edges,
        }
    }
}

/// Reference to one solid edge of an element: the anchor of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    pub element: ElementId,
    pub solid: usize,
    pub edge: usize,
}

impl std::fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.element, self.solid, self.edge)
    }
}
