// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! View-local basis for placing annotations in a drawing plane.

use annograph_model::View;
use nalgebra::{Point3, Vector3};

use crate::error::{GeometryError, Result};

/// Unit right/up/view-direction vectors of a drawing view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFrame {
    right: Vector3<f64>,
    up: Vector3<f64>,
    direction: Vector3<f64>,
}

impl ViewFrame {
    /// Normalizes the three vectors. Fails on non-finite or zero vectors.
    pub fn new(right: Vector3<f64>, up: Vector3<f64>, direction: Vector3<f64>) -> Result<Self> {
        let unit = |v: Vector3<f64>, name: &str| {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(GeometryError::DegenerateBasis(format!("{} is not finite", name)));
            }
            v.try_normalize(1e-12)
                .ok_or_else(|| GeometryError::DegenerateBasis(format!("{} has zero length", name)))
        };
        Ok(Self {
            right: unit(right, "right")?,
            up: unit(up, "up")?,
            direction: unit(direction, "view direction")?,
        })
    }

    pub fn from_view(view: &View) -> Result<Self> {
        Self::new(view.right, view.up, view.view_direction)
    }

    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.right
    }

    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.up
    }

    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// `p + right * along_right + up * along_up`.
    #[inline]
    pub fn offset(&self, p: Point3<f64>, along_right: f64, along_up: f64) -> Point3<f64> {
        p + self.right * along_right + self.up * along_up
    }

    /// Symmetric span of half-length `half` along view-up, centered on `center`.
    pub fn span_up(&self, center: Point3<f64>, half: f64) -> (Point3<f64>, Point3<f64>) {
        self.span_along(center, self.up, half)
    }

    /// Symmetric span of half-length `half` along `dir`, centered on `center`.
    pub fn span_along(
        &self,
        center: Point3<f64>,
        dir: Vector3<f64>,
        half: f64,
    ) -> (Point3<f64>, Point3<f64>) {
        (center - dir * half, center + dir * half)
    }

    /// Component of `v` lying in the drawing plane, normalized. Falls back to
    /// view-right when `v` is (nearly) parallel to the view direction.
    pub fn in_plane(&self, v: Vector3<f64>) -> Vector3<f64> {
        let projected = v - self.direction * v.dot(&self.direction);
        projected.try_normalize(1e-9).unwrap_or(self.right)
    }
}
