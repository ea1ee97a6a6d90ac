// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annotation pass: collect predicted elements, plan, place, commit.
//!
//! ```text
//! Idle -> Collecting -> Placing -> Committed
//!                          \-----> Aborted
//! ```
//!
//! All placements of a pass go into one named transaction. Per-element
//! failures are recorded and the pass continues; a document failure rolls
//! the transaction back and nothing of the pass remains.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use annograph_graph::{build_nodes, ExportFilter, Node};
use annograph_model::{AnnotationKind, ModelDocument};

use crate::config::PlacementConfig;
use crate::error::{PassError, PlacementError};
use crate::planner::{submit, PlacementContext};
use crate::prediction::{AnnotationNeed, PredictionSet};
use crate::report::{PassReport, PassState, PlacementOutcome};

/// Name of the transaction holding a pass's annotations.
pub const TRANSACTION_NAME: &str = "Apply annotation predictions";

/// Shared cancellation flag, checked before the pass and between elements.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives annotation passes against a document.
#[derive(Debug, Default)]
pub struct AnnotationOrchestrator {
    config: PlacementConfig,
    filter: ExportFilter,
    cancel: CancelFlag,
    state: PassState,
}

impl AnnotationOrchestrator {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Restricts the elements considered for annotation.
    pub fn with_filter(mut self, filter: ExportFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that cancels this orchestrator's passes.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// State reached by the last pass.
    pub fn state(&self) -> PassState {
        self.state
    }

    fn transition(&mut self, next: PassState) {
        tracing::debug!(from = %self.state, to = %next, "Annotation pass state");
        self.state = next;
    }

    /// Runs one pass.
    ///
    /// Fails without touching the document when the pass is cancelled up
    /// front or there is no annotatable active view.
    pub fn run<D: ModelDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        predictions: &PredictionSet,
    ) -> Result<PassReport, PassError> {
        self.state = PassState::Idle;
        if self.cancel.is_cancelled() {
            return Err(PassError::Cancelled { report: None });
        }

        let view = doc.active_view().cloned().ok_or(PassError::NoActiveView)?;
        if !view.view_type.is_annotatable() {
            return Err(PassError::UnsupportedView(view.view_type));
        }
        let context = PlacementContext::for_view(&view, self.config.clone())?;

        let mut report = PassReport {
            view: Some(view.id),
            ..Default::default()
        };

        self.transition(PassState::Collecting);
        let candidates = self.collect(&*doc, predictions, &mut report);

        self.transition(PassState::Placing);
        report.state = PassState::Placing;
        if let Err(e) = doc.begin_transaction(TRANSACTION_NAME) {
            // Nothing of this pass is open, so there is nothing to roll back.
            return Err(self.fail(report, format!("could not start transaction: {}", e)));
        }

        for (node, need) in &candidates {
            if self.cancel.is_cancelled() {
                doc.rollback_transaction();
                self.transition(PassState::Aborted);
                report.state = PassState::Aborted;
                tracing::warn!(
                    attempted = report.attempted,
                    "Annotation pass cancelled, placements discarded"
                );
                return Err(PassError::Cancelled {
                    report: Some(Box::new(report)),
                });
            }

            for kind in kinds(*need) {
                let outcome = match context.plan(&*doc, node, kind) {
                    Ok(plan) => match submit(&mut *doc, &plan) {
                        Ok(annotation) => PlacementOutcome::placed(
                            node.category,
                            node.id,
                            kind,
                            annotation,
                            plan.summary,
                        ),
                        Err(rejected) if rejected.is_recoverable() => PlacementOutcome::failed(
                            node.category,
                            node.id,
                            kind,
                            PlacementError::NativeRejection(rejected.to_string()).to_string(),
                        ),
                        Err(fatal) => {
                            let detail = format!("{} for element {}: {}", kind, node.id, fatal);
                            return Err(self.abort(doc, report, detail));
                        }
                    },
                    Err(e) => PlacementOutcome::failed(node.category, node.id, kind, e.to_string()),
                };

                if outcome.is_placed() {
                    tracing::info!(
                        id = %node.id,
                        category = %node.category,
                        kind = %kind,
                        "Placed: {}",
                        outcome.reason
                    );
                } else {
                    tracing::warn!(
                        id = %node.id,
                        category = %node.category,
                        kind = %kind,
                        "Failed: {}",
                        outcome.reason
                    );
                }
                report.record(outcome);
            }
        }

        if let Err(e) = doc.commit_transaction() {
            return Err(self.abort(doc, report, format!("could not commit transaction: {}", e)));
        }
        self.transition(PassState::Committed);
        report.state = PassState::Committed;
        tracing::info!("{}", report);
        Ok(report)
    }

    /// Nodes of the collected elements that have a prediction.
    fn collect<D: ModelDocument + ?Sized>(
        &self,
        doc: &D,
        predictions: &PredictionSet,
        report: &mut PassReport,
    ) -> Vec<(Node, AnnotationNeed)> {
        let set = build_nodes(doc, &self.filter);
        report.skipped_elements = set.skipped.len();

        let candidates: Vec<(Node, AnnotationNeed)> = set
            .nodes
            .into_iter()
            .filter_map(|node| predictions.need(node.id).map(|need| (node, need)))
            .collect();

        report.candidates = candidates.len();
        report.predicted_dimension = candidates.iter().filter(|(_, n)| n.needs_dimension()).count();
        report.predicted_text = candidates.iter().filter(|(_, n)| n.needs_text()).count();
        tracing::debug!(
            candidates = report.candidates,
            dimension = report.predicted_dimension,
            text = report.predicted_text,
            "Collected annotation candidates"
        );
        candidates
    }

    /// Rolls back the pass's transaction and fails the pass.
    fn abort<D: ModelDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        report: PassReport,
        detail: String,
    ) -> PassError {
        doc.rollback_transaction();
        self.fail(report, detail)
    }

    fn fail(&mut self, mut report: PassReport, detail: String) -> PassError {
        self.transition(PassState::Aborted);
        report.state = PassState::Aborted;
        report.fatal = Some(detail.clone());
        tracing::error!(detail = %detail, "Annotation pass aborted, placements discarded");
        PassError::Fatal {
            detail,
            report: Box::new(report),
        }
    }
}

/// Annotation kinds requested by a need, dimension first.
fn kinds(need: AnnotationNeed) -> impl Iterator<Item = AnnotationKind> {
    let dimension = need.needs_dimension().then_some(AnnotationKind::Dimension);
    let text = need.needs_text().then_some(AnnotationKind::Text);
    dimension.into_iter().chain(text)
}
