// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use annograph_model::ElementId;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Errors that can occur during reference-edge analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no usable solid on element {0}")]
    NoSolid(ElementId),

    #[error("element {element} has {found} qualifying edges, need 2")]
    InsufficientEdges { element: ElementId, found: usize },

    #[error("top and bottom reference of element {0} resolve to the same edge")]
    IndistinctReferences(ElementId),

    #[error("view basis is degenerate: {0}")]
    DegenerateBasis(String),
}

impl GeometryError {
    /// True when the element has geometry but not enough distinct anchors.
    pub fn is_reference_shortage(&self) -> bool {
        matches!(
            self,
            GeometryError::InsufficientEdges { .. } | GeometryError::IndistinctReferences(_)
        )
    }
}
