// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annotation pass over the shared small-building snapshot.

use std::path::PathBuf;

use annograph_annotate::{
    read_predictions_file, AnnotationOrchestrator, Outcome, PassState, PlacementConfig,
};
use annograph_model::{AnnotationKind, Category, ElementId, MemoryDocument};
use approx::assert_relative_eq;

fn models_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/models")
}

fn load() -> MemoryDocument {
    MemoryDocument::load(models_dir().join("small_building.json")).expect("snapshot should load")
}

#[test]
fn full_pass() {
    let mut doc = load();
    let parsed = read_predictions_file(&models_dir().join("small_building_predictions.csv")).unwrap();
    assert_eq!(parsed.skipped, 1);

    let report = AnnotationOrchestrator::new(PlacementConfig::default())
        .run(&mut doc, &parsed.predictions)
        .unwrap();

    assert_eq!(report.state, PassState::Committed);
    assert_eq!(report.view, Some(ElementId(100)));
    // Level 10 is a candidate with class 0; id 999 is not in the model.
    assert_eq!(report.candidates, 9);
    assert_eq!(report.predicted_dimension, 6);
    assert_eq!(report.predicted_text, 4);
    assert_eq!((report.attempted, report.succeeded, report.failed), (10, 8, 2));
    assert_eq!(doc.annotations().len(), 8);

    let failures: Vec<_> = report
        .failures()
        .map(|p| (p.category, p.id.0, p.kind))
        .collect();
    assert_eq!(
        failures,
        vec![
            (Category::GenericModel, 5, AnnotationKind::Text),
            (Category::StructuralFoundation, 7, AnnotationKind::Dimension),
        ]
    );
    assert!(report
        .placements
        .iter()
        .any(|p| p.reason == "text suppressed for generic model" && p.outcome == Outcome::Failed));
}

#[test]
fn wall_dimension_spans_its_height() {
    let mut doc = load();
    let parsed = read_predictions_file(&models_dir().join("small_building_predictions.csv")).unwrap();
    AnnotationOrchestrator::default()
        .run(&mut doc, &parsed.predictions)
        .unwrap();

    let dims = doc.dimensions_for(ElementId(1));
    assert_eq!(dims.len(), 1);
    let line = dims[0].line;
    assert_relative_eq!(line.end.z - line.start.z, 12.0, epsilon = 1e-9);

    let texts = doc.texts_for(ElementId(11));
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].text, "Level 2 +3048");

    let room = doc.texts_for(ElementId(6));
    assert!(room[0].text.starts_with("Office 101\n"));
    assert!(room[0].text.ends_with("H: 2743 mm"));

    assert!(doc.texts_for(ElementId(5)).is_empty());
}

#[test]
fn aborted_pass_leaves_no_annotations() {
    let mut doc = load();
    doc.fail_fatally_after(3);
    let parsed = read_predictions_file(&models_dir().join("small_building_predictions.csv")).unwrap();
    let err = AnnotationOrchestrator::default()
        .run(&mut doc, &parsed.predictions)
        .unwrap_err();

    assert_eq!(err.report().unwrap().state, PassState::Aborted);
    assert!(doc.annotations().is_empty());
    assert!(!doc.in_transaction());
}
