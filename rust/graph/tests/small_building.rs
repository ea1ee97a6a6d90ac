// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export path over the shared small-building snapshot.

use std::path::PathBuf;

use annograph_graph::{
    build_nodes, parse_edges, parse_nodes, write_edges, write_nodes, BuildingGraph, EdgeKind,
    ExportFilter, GraphConfig,
};
use annograph_model::{Category, ElementId, MemoryDocument};
use approx::assert_relative_eq;

fn snapshot_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/models")
        .join("small_building.json")
}

fn load() -> MemoryDocument {
    MemoryDocument::load(snapshot_path()).expect("snapshot should load")
}

fn assemble(doc: &MemoryDocument) -> BuildingGraph {
    let set = build_nodes(doc, &ExportFilter::default());
    assert!(set.skipped.is_empty());
    BuildingGraph::assemble(set.nodes, &GraphConfig::default())
}

fn pairs(graph: &BuildingGraph, kind: EdgeKind) -> Vec<(i64, i64)> {
    graph.edges_of_kind(kind).map(|e| (e.src.0, e.dst.0)).collect()
}

#[test]
fn nodes_follow_document_order() {
    let doc = load();
    let graph = assemble(&doc);
    let ids: Vec<i64> = graph.nodes().iter().map(|n| n.id.0).collect();
    assert_eq!(ids, vec![10, 11, 1, 2, 3, 4, 5, 6, 7]);

    let beam = graph.node(ElementId(4)).unwrap();
    assert_relative_eq!(beam.length, 19.34);
    assert_relative_eq!(beam.level_elevation, 10.0);

    let room = graph.node(ElementId(6)).unwrap();
    assert_eq!(room.room_name, "Office");
    assert_relative_eq!(room.height, 9.0);
}

#[test]
fn host_level_and_adjacent_edges() {
    let graph = assemble(&load());

    assert_eq!(pairs(&graph, EdgeKind::Host), vec![(1, 5)]);
    assert_eq!(
        pairs(&graph, EdgeKind::Level),
        vec![(10, 1), (10, 2), (10, 3), (11, 4), (10, 5), (10, 6)]
    );
    assert_eq!(
        pairs(&graph, EdgeKind::Adjacent),
        vec![
            (1, 2),
            (1, 3),
            (1, 5),
            (1, 6),
            (2, 3),
            (2, 4),
            (2, 6),
            (3, 6),
            (4, 6)
        ]
    );

    // The isolated footing is its own component.
    let components = graph.connected_components();
    assert_eq!(components.len(), 2);
    assert_eq!(components[1], vec![ElementId(7)]);
}

#[test]
fn category_whitelist_drops_edges_to_excluded_nodes() {
    let doc = load();
    let filter = ExportFilter {
        categories: vec![Category::Wall, Category::GenericModel],
        ids: None,
    };
    let graph = BuildingGraph::assemble(build_nodes(&doc, &filter).nodes, &GraphConfig::default());

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edges_of_kind(EdgeKind::Level).count(), 0);
    assert_eq!(pairs(&graph, EdgeKind::Host), vec![(1, 5)]);
    for edge in graph.edges() {
        assert!(graph.contains(edge.src) && graph.contains(edge.dst));
    }
}

#[test]
fn tables_round_trip() {
    let graph = assemble(&load());

    let mut nodes_buf = Vec::new();
    write_nodes(&mut nodes_buf, graph.nodes()).unwrap();
    let nodes = parse_nodes(nodes_buf.as_slice()).unwrap();
    assert_eq!(nodes.len(), graph.node_count());
    for (parsed, original) in nodes.iter().zip(graph.nodes()) {
        assert_eq!(parsed.id, original.id);
        assert_eq!(parsed.category, original.category);
        assert_eq!(parsed.type_name, original.type_name);
        assert_relative_eq!(parsed.length, original.length, epsilon = 1e-6);
        assert_relative_eq!(parsed.level_elevation, original.level_elevation, epsilon = 1e-6);
    }

    let mut edges_buf = Vec::new();
    write_edges(&mut edges_buf, graph.edges()).unwrap();
    assert_eq!(parse_edges(edges_buf.as_slice()).unwrap(), graph.edges());
}

#[test]
fn export_is_idempotent() {
    let doc = load();
    let render = |graph: &BuildingGraph| {
        let mut buf = Vec::new();
        write_nodes(&mut buf, graph.nodes()).unwrap();
        buf
    };
    assert_eq!(render(&assemble(&doc)), render(&assemble(&doc)));
}
