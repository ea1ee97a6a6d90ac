// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use annograph_model::{
    Category, Element, ElementId, Error, MemoryDocument, ModelDocument, ModelSnapshot,
    ViewType,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/models").join(name)
}

#[test]
fn loads_small_building() {
    let doc = MemoryDocument::load(fixture("small_building.json")).unwrap();

    let view = doc.active_view().unwrap();
    assert_eq!(view.id, ElementId(100));
    assert_eq!(view.view_type, ViewType::Elevation);

    let ids: Vec<i64> = doc
        .collect_elements(&Category::ALL)
        .into_iter()
        .map(|id| id.0)
        .collect();
    assert_eq!(ids, vec![10, 11, 1, 2, 3, 4, 5, 6, 7]);

    let walls = doc.collect_elements(&[Category::Wall]);
    assert_eq!(walls, vec![ElementId(1), ElementId(2)]);
}

#[test]
fn derived_box_solids_skip_rooms_and_levels() {
    let doc = MemoryDocument::load(fixture("small_building.json")).unwrap();
    assert!(!doc.solids(ElementId(1)).is_empty());
    assert!(!doc.solids(ElementId(4)).is_empty());
    assert!(doc.solids(ElementId(6)).is_empty());
    assert!(doc.solids(ElementId(10)).is_empty());
    assert!(doc.solids(ElementId(999)).is_empty());
}

#[test]
fn duplicate_ids_are_refused() {
    let snapshot = ModelSnapshot {
        elements: vec![Element::new(1, Category::Wall), Element::new(1, Category::Floor)],
        ..Default::default()
    };
    assert!(matches!(
        MemoryDocument::from_snapshot(snapshot),
        Err(Error::DuplicateElement(ElementId(1)))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let result = MemoryDocument::load(fixture("does_not_exist.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}
