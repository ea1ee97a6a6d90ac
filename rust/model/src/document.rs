// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The seam to the host model document.
//!
//! Reads (element collection, element records, solids, active view) take
//! `&self`. Annotation creation happens inside a single named transaction
//! and takes `&mut self`; the host enforces a single writer.

use crate::category::Category;
use crate::element::Element;
use crate::ids::{AnnotationId, ElementId};
use crate::request::{DimensionRequest, TextRequest};
use crate::solid::Solid;
use crate::view::View;

/// Failure reported by the document for a mutation call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// The host refused to create this one annotation. Recoverable.
    #[error("{0}")]
    Rejected(String),

    /// The document is in a state where the pass cannot continue.
    #[error("document failure: {0}")]
    Fatal(String),

    /// A mutation was attempted outside an open transaction.
    #[error("no open transaction")]
    NoTransaction,
}

impl DocumentError {
    /// Only per-annotation rejections are recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DocumentError::Rejected(_))
    }
}

/// Access to a building model document.
pub trait ModelDocument {
    /// Ids of all elements in `categories`, in document order.
    fn collect_elements(&self, categories: &[Category]) -> Vec<ElementId>;

    /// The element record for `id`.
    fn element(&self, id: ElementId) -> Option<&Element>;

    /// Solid geometry of `id`, computed on demand. Empty when the element has
    /// no solid representation.
    fn solids(&self, id: ElementId) -> Vec<Solid>;

    /// The view annotations are placed in.
    fn active_view(&self) -> Option<&View>;

    fn begin_transaction(&mut self, name: &str) -> Result<(), DocumentError>;

    fn create_dimension(&mut self, request: &DimensionRequest) -> Result<AnnotationId, DocumentError>;

    fn create_text(&mut self, request: &TextRequest) -> Result<AnnotationId, DocumentError>;

    /// Makes every annotation created since `begin_transaction` permanent.
    fn commit_transaction(&mut self) -> Result<(), DocumentError>;

    /// Discards every annotation created since `begin_transaction`.
    fn rollback_transaction(&mut self);
}
