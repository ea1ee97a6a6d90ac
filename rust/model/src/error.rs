// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for snapshot loading and document access.

use crate::ids::ElementId;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or querying a model snapshot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The snapshot JSON could not be decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Reading the snapshot from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two elements in one snapshot share an id.
    #[error("duplicate element id {0}")]
    DuplicateElement(ElementId),
}
