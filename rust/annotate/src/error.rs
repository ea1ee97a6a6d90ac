// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for placement and annotation passes.

use annograph_geometry::GeometryError;
use annograph_model::{AnnotationKind, Category, ViewType};

use crate::report::PassReport;

/// Result type alias for prediction table I/O.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading predictions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Table(#[from] annograph_graph::Error),
}

/// Per-element placement failure. Always recovered by the orchestrator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("missing geometry: {0}")]
    GeometryUnavailable(String),

    #[error("insufficient references: {0}")]
    ReferenceInsufficient(String),

    #[error("creation rejected: {0}")]
    NativeRejection(String),

    #[error("no {kind} placement for {category}")]
    Unsupported {
        category: Category,
        kind: AnnotationKind,
    },

    #[error("text suppressed for generic model")]
    TextSuppressed,
}

impl From<GeometryError> for PlacementError {
    fn from(err: GeometryError) -> Self {
        if err.is_reference_shortage() {
            PlacementError::ReferenceInsufficient(err.to_string())
        } else {
            PlacementError::GeometryUnavailable(err.to_string())
        }
    }
}

/// Pass-level failure.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("view type {0} does not accept annotations")]
    UnsupportedView(ViewType),

    #[error("no active view")]
    NoActiveView,

    #[error("invalid view basis: {0}")]
    InvalidViewBasis(#[from] GeometryError),

    /// Cancelled through the pass's [`crate::CancelFlag`]. The report is
    /// present when placement had started; its placements were rolled back.
    #[error("annotation pass cancelled")]
    Cancelled { report: Option<Box<PassReport>> },

    /// The mutation phase failed; every placement of the pass was discarded.
    #[error("annotation pass aborted: {detail}")]
    Fatal {
        detail: String,
        report: Box<PassReport>,
    },
}

impl PassError {
    /// Report of a pass that stopped after placement started.
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            PassError::Fatal { report, .. } => Some(report),
            PassError::Cancelled { report } => report.as_deref(),
            _ => None,
        }
    }
}
