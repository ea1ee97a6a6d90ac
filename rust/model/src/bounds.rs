// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes in the native length unit.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned 3D bounding box.
///
/// `min <= max` holds on every axis: constructors and deserialization order
/// the corners componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBox")]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

#[derive(Deserialize)]
struct RawBox {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl From<RawBox> for BoundingBox {
    fn from(raw: RawBox) -> Self {
        BoundingBox::new(raw.min, raw.max)
    }
}

impl BoundingBox {
    /// Creates a box from two opposite corners in any order.
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates a box from raw corner coordinates.
    pub fn from_coords(min: [f64; 3], max: [f64; 3]) -> Self {
        Self::new(Point3::from(min), Point3::from(max))
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Extent along each axis.
    #[inline]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the min→max diagonal.
    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.size().norm()
    }

    /// True when all six coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }

    /// Inclusive overlap test on all three axes, each widened by `tolerance`.
    ///
    /// Symmetric: `a.overlaps_within(b, t) == b.overlaps_within(a, t)`.
    pub fn overlaps_within(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (0..3).all(|axis| {
            self.min[axis] - tolerance <= other.max[axis]
                && other.min[axis] - tolerance <= self.max[axis]
        })
    }
}
