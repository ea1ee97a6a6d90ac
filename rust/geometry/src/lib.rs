// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! annograph geometry
//!
//! The narrow slice of solid analysis the annotation planners need: picking
//! reference edges off an element's solids, and expressing offsets in a
//! drawing view's right/up basis.

pub mod error;
pub mod frame;
pub mod reference;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use error::{GeometryError, Result};
pub use frame::ViewFrame;
pub use reference::{
    first_two_edges, horizontal_extremes, HorizontalExtremes, ReferenceEdge,
    HORIZONTAL_TOLERANCE,
};
