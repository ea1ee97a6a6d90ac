// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-pass diagnostic report.

use annograph_model::{AnnotationId, AnnotationKind, Category, ElementId};
use serde::{Deserialize, Serialize};

/// Orchestrator state. A pass ends in `Committed` or `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassState {
    #[default]
    Idle,
    Collecting,
    Placing,
    Committed,
    Aborted,
}

impl PassState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassState::Idle => "idle",
            PassState::Collecting => "collecting",
            PassState::Placing => "placing",
            PassState::Committed => "committed",
            PassState::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for PassState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Placed,
    Failed,
}

/// One attempted placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementOutcome {
    pub category: Category,
    pub id: ElementId,
    pub kind: AnnotationKind,
    pub outcome: Outcome,
    /// Success summary or failure reason.
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<AnnotationId>,
}

impl PlacementOutcome {
    pub fn placed(
        category: Category,
        id: ElementId,
        kind: AnnotationKind,
        annotation: AnnotationId,
        summary: String,
    ) -> Self {
        Self {
            category,
            id,
            kind,
            outcome: Outcome::Placed,
            reason: summary,
            annotation: Some(annotation),
        }
    }

    pub fn failed(category: Category, id: ElementId, kind: AnnotationKind, reason: String) -> Self {
        Self {
            category,
            id,
            kind,
            outcome: Outcome::Failed,
            reason,
            annotation: None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.outcome == Outcome::Placed
    }
}

/// Counts and per-placement log of one annotation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub state: PassState,
    pub view: Option<ElementId>,
    /// Collected elements that have a prediction.
    pub candidates: usize,
    pub predicted_dimension: usize,
    pub predicted_text: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Elements that could not be turned into nodes.
    pub skipped_elements: usize,
    /// Raw failure detail of an aborted pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
    pub placements: Vec<PlacementOutcome>,
}

impl PassReport {
    /// Adds one attempted placement and updates the counts.
    pub fn record(&mut self, outcome: PlacementOutcome) {
        self.attempted += 1;
        if outcome.is_placed() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.placements.push(outcome);
    }

    pub fn failures(&self) -> impl Iterator<Item = &PlacementOutcome> {
        self.placements.iter().filter(|p| !p.is_placed())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for PassReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} candidates, {} predicted for dimension, {} predicted for text, \
             {} attempted, {} succeeded, {} failed",
            self.state,
            self.candidates,
            self.predicted_dimension,
            self.predicted_text,
            self.attempted,
            self.succeeded,
            self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_summary() {
        let mut report = PassReport {
            candidates: 2,
            predicted_dimension: 1,
            predicted_text: 1,
            ..Default::default()
        };
        report.record(PlacementOutcome::placed(
            Category::Wall,
            ElementId(1),
            AnnotationKind::Dimension,
            AnnotationId(1),
            "wall height 3048 mm".into(),
        ));
        report.record(PlacementOutcome::failed(
            Category::GenericModel,
            ElementId(2),
            AnnotationKind::Text,
            "text suppressed for generic model".into(),
        ));
        report.state = PassState::Committed;

        assert_eq!((report.attempted, report.succeeded, report.failed), (2, 1, 1));
        assert_eq!(report.failures().count(), 1);
        assert_eq!(
            report.to_string(),
            "committed: 2 candidates, 1 predicted for dimension, 1 predicted for text, \
             2 attempted, 1 succeeded, 1 failed"
        );
    }

    #[test]
    fn json_shape() {
        let mut report = PassReport::default();
        report.record(PlacementOutcome::failed(
            Category::Room,
            ElementId(6),
            AnnotationKind::Dimension,
            "no dimension placement for Rooms".into(),
        ));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["state"], "idle");
        assert_eq!(value["placements"][0]["category"], "Rooms");
        assert_eq!(value["placements"][0]["kind"], "dimension");
        assert_eq!(value["placements"][0]["outcome"], "failed");
        assert!(value.get("fatal").is_none());
        assert!(value["placements"][0].get("annotation").is_none());
    }
}
