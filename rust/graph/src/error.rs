// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for node building and table I/O.

use annograph_model::ElementId;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the export path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Malformed node/edge table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("unexpected header: expected '{expected}', found '{found}'")]
    Header { expected: String, found: String },

    #[error("line {line}: {message}")]
    Row { line: usize, message: String },
}

/// Per-element node extraction failure. The element is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeError {
    #[error("element {0} is not in the document")]
    MissingElement(ElementId),

    #[error("element {0} has a non-finite bounding box")]
    NonFiniteBounds(ElementId),
}
