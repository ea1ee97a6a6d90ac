// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element placement: a point or a driving curve.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Curve used for location lines and room boundary segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Line {
        start: Point3<f64>,
        end: Point3<f64>,
    },
    /// Circular arc through three points.
    Arc {
        start: Point3<f64>,
        mid: Point3<f64>,
        end: Point3<f64>,
    },
}

impl Curve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve::Line { start, end }
    }

    pub fn start(&self) -> Point3<f64> {
        match *self {
            Curve::Line { start, .. } | Curve::Arc { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point3<f64> {
        match *self {
            Curve::Line { end, .. } | Curve::Arc { end, .. } => end,
        }
    }

    /// Parametric midpoint: the chord center for lines, the through-point
    /// for arcs.
    pub fn midpoint(&self) -> Point3<f64> {
        match *self {
            Curve::Line { start, end } => nalgebra::center(&start, &end),
            Curve::Arc { mid, .. } => mid,
        }
    }

    /// Unit direction of a straight line. Arcs and zero-length lines have none.
    pub fn direction(&self) -> Option<Vector3<f64>> {
        match *self {
            Curve::Line { start, end } => (end - start).try_normalize(f64::EPSILON),
            Curve::Arc { .. } => None,
        }
    }
}

/// Location of an element in the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Point(Point3<f64>),
    Curve(Curve),
}

impl Location {
    /// Representative point: the point itself or the curve midpoint.
    pub fn anchor(&self) -> Point3<f64> {
        match self {
            Location::Point(p) => *p,
            Location::Curve(c) => c.midpoint(),
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Location::Curve(c) => Some(c),
            Location::Point(_) => None,
        }
    }
}
