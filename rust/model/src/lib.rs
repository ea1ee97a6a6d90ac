// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # annograph model
//!
//! Typed snapshot of a building model as seen by the graph export and the
//! annotation passes: element records, on-demand solid geometry, the active
//! drawing view, and the placement requests sent back to the host.
//!
//! The host document is reached only through [`ModelDocument`]. The
//! [`MemoryDocument`] implementation backs tests and the command-line driver
//! and can be loaded from a JSON [`ModelSnapshot`].

pub mod bounds;
pub mod category;
pub mod document;
pub mod element;
pub mod error;
pub mod ids;
pub mod location;
pub mod memory;
pub mod params;
pub mod request;
pub mod solid;
pub mod view;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bounds::BoundingBox;
pub use category::Category;
pub use document::{DocumentError, ModelDocument};
pub use element::{Element, LevelData, RoomData};
pub use error::{Error, Result};
pub use ids::{AnnotationId, ElementId};
pub use location::{Curve, Location};
pub use memory::{CreatedAnnotation, MemoryDocument, ModelSnapshot};
pub use params::{ParamValue, Parameters};
pub use request::{AnnotationKind, DimensionRequest, Line3, PlacementRequest, TextRequest};
pub use solid::{EdgeRef, Face, Solid, SolidEdge};
pub use view::{View, ViewType};

/// Millimetres per native length unit (decimal feet).
pub const MM_PER_FOOT: f64 = 304.8;
