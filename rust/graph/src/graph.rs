// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element graph: nodes connected by host, level and adjacency edges.
//!
//! Host and level edges follow back-references stored on the nodes. Adjacent
//! edges are inferred from bounding boxes that overlap within a tolerance on
//! all three axes. Every edge connects two nodes of the same graph; edges
//! whose endpoint is missing are never created.

use std::collections::VecDeque;

use annograph_model::ElementId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Relation carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Host → hosted element.
    Host,
    /// Level → element on that level.
    Level,
    /// Inferred spatial adjacency (undirected, stored once with src < dst
    /// in node order).
    Adjacent,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Host => "host",
            EdgeKind::Level => "level",
            EdgeKind::Adjacent => "adjacent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "host" => Some(EdgeKind::Host),
            "level" => Some(EdgeKind::Level),
            "adjacent" => Some(EdgeKind::Adjacent),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An edge in the element graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub src: ElementId,
    pub dst: ElementId,
    pub kind: EdgeKind,
}

/// Graph assembly settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphConfig {
    /// Per-axis slack for the bounding-box overlap test.
    pub adjacency_tolerance: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            adjacency_tolerance: 0.05,
        }
    }
}

/// Graph over the nodes of one export pass.
#[derive(Debug, Default)]
pub struct BuildingGraph {
    nodes: Vec<Node>,
    edges: Vec<GraphEdge>,
    /// Adjacency list: node index → list of (neighbor index, edge index).
    adjacency: Vec<Vec<(usize, usize)>>,
    /// Map from element id to node index for fast lookup.
    index: FxHashMap<ElementId, usize>,
}

impl BuildingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full graph: host edges, then level edges, then adjacency.
    ///
    /// Adjacency compares every unordered pair once, O(n²) in the node count.
    pub fn assemble(nodes: Vec<Node>, config: &GraphConfig) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }

        for i in 0..graph.nodes.len() {
            let (id, host) = (graph.nodes[i].id, graph.nodes[i].host_id);
            if let Some(host) = host {
                graph.add_edge(host, id, EdgeKind::Host);
            }
        }

        for i in 0..graph.nodes.len() {
            let (id, level) = (graph.nodes[i].id, graph.nodes[i].level_id);
            if let Some(level) = level {
                graph.add_edge(level, id, EdgeKind::Level);
            }
        }

        let tol = config.adjacency_tolerance;
        let n = graph.nodes.len();
        for i in 0..n {
            let Some(a) = graph.nodes[i].bounding_box else {
                continue;
            };
            for j in (i + 1)..n {
                let Some(b) = graph.nodes[j].bounding_box else {
                    continue;
                };
                if a.overlaps_within(&b, tol) {
                    let (src, dst) = (graph.nodes[i].id, graph.nodes[j].id);
                    graph.add_edge(src, dst, EdgeKind::Adjacent);
                }
            }
        }

        let (host, level, adjacent) = graph.kind_counts();
        tracing::info!(
            nodes = graph.node_count(),
            host,
            level,
            adjacent,
            "Assembled element graph"
        );
        graph
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Adds a node. A second node with an id already present is ignored.
    /// Returns the node's index.
    pub fn add_node(&mut self, node: Node) -> usize {
        if let Some(&idx) = self.index.get(&node.id) {
            tracing::warn!(id = %node.id, "Duplicate node id ignored");
            return idx;
        }
        let idx = self.nodes.len();
        self.index.insert(node.id, idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Adds an edge between two nodes of this graph.
    ///
    /// Returns `false` (and adds nothing) when either endpoint is absent or
    /// both endpoints are the same node.
    pub fn add_edge(&mut self, src: ElementId, dst: ElementId, kind: EdgeKind) -> bool {
        let (Some(&s), Some(&d)) = (self.index.get(&src), self.index.get(&dst)) else {
            return false;
        };
        if s == d {
            return false;
        }
        let idx = self.edges.len();
        self.edges.push(GraphEdge { src, dst, kind });
        self.adjacency[s].push((d, idx));
        self.adjacency[d].push((s, idx));
        true
    }

    // =========================================================================
    // Graph accessors
    // =========================================================================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Neighbors of `id` with the kind of the connecting edge.
    pub fn neighbors(&self, id: ElementId) -> Vec<(ElementId, EdgeKind)> {
        let Some(&i) = self.index.get(&id) else {
            return Vec::new();
        };
        self.adjacency[i]
            .iter()
            .map(|&(n, e)| (self.nodes[n].id, self.edges[e].kind))
            .collect()
    }

    /// Number of edges touching `id`.
    pub fn degree(&self, id: ElementId) -> usize {
        self.index.get(&id).map_or(0, |&i| self.adjacency[i].len())
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Edge counts as (host, level, adjacent).
    pub fn kind_counts(&self) -> (usize, usize, usize) {
        self.edges.iter().fold((0, 0, 0), |(h, l, a), e| match e.kind {
            EdgeKind::Host => (h + 1, l, a),
            EdgeKind::Level => (h, l + 1, a),
            EdgeKind::Adjacent => (h, l, a + 1),
        })
    }

    /// Connected components (any edge kind), as element ids in node order.
    pub fn connected_components(&self) -> Vec<Vec<ElementId>> {
        let n = self.node_count();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            visited[start] = true;
            queue.push_back(start);

            while let Some(node) = queue.pop_front() {
                component.push(self.nodes[node].id);
                for &(neighbor, _) in &self.adjacency[node] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(component);
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annograph_model::{BoundingBox, Category};

    fn boxed(id: i64, category: Category, min: [f64; 3], max: [f64; 3]) -> Node {
        let mut node = Node::bare(ElementId(id), category);
        node.bounding_box = Some(BoundingBox::from_coords(min, max));
        node
    }

    fn sample_nodes() -> Vec<Node> {
        let mut level = Node::bare(ElementId(100), Category::Level);
        level.bounding_box = Some(BoundingBox::from_coords([0.0, 0.0, -0.1], [10.0, 10.0, 0.1]));

        let mut wall = boxed(1, Category::Wall, [0.0, 0.0, 0.0], [10.0, 1.0, 10.0]);
        wall.level_id = Some(ElementId(100));

        let mut floor = boxed(2, Category::Floor, [0.0, 0.0, -1.0], [10.0, 10.0, 0.03]);
        floor.level_id = Some(ElementId(100));

        // Hosted by the wall, level missing from the set.
        let mut generic = boxed(3, Category::GenericModel, [2.0, 0.2, 2.0], [3.0, 0.8, 3.0]);
        generic.host_id = Some(ElementId(1));
        generic.level_id = Some(ElementId(999));

        let far = boxed(4, Category::GenericModel, [40.0, 40.0, 40.0], [41.0, 41.0, 41.0]);

        let mut dangling = Node::bare(ElementId(5), Category::StructuralFraming);
        dangling.host_id = Some(ElementId(777));

        vec![level, wall, floor, generic, far, dangling]
    }

    #[test]
    fn host_and_level_edges() {
        let g = BuildingGraph::assemble(sample_nodes(), &GraphConfig::default());
        let hosts: Vec<_> = g.edges_of_kind(EdgeKind::Host).copied().collect();
        assert_eq!(
            hosts,
            vec![GraphEdge {
                src: ElementId(1),
                dst: ElementId(3),
                kind: EdgeKind::Host
            }]
        );

        let levels: Vec<_> = g.edges_of_kind(EdgeKind::Level).map(|e| (e.src.0, e.dst.0)).collect();
        assert_eq!(levels, vec![(100, 1), (100, 2)]);
    }

    #[test]
    fn adjacency_from_overlap() {
        let g = BuildingGraph::assemble(sample_nodes(), &GraphConfig::default());
        let adjacent: Vec<_> = g
            .edges_of_kind(EdgeKind::Adjacent)
            .map(|e| (e.src.0, e.dst.0))
            .collect();
        // The level slab overlaps the wall and floor bottoms. Wall/floor touch
        // at z = 0..0.03, generic sits inside the wall box, the far box
        // overlaps nothing.
        assert_eq!(adjacent, vec![(100, 1), (100, 2), (1, 2), (1, 3)]);
    }

    #[test]
    fn boxed_levels_take_part_in_adjacency() {
        let level = boxed(10, Category::Level, [0.0, 0.0, 0.0], [10.0, 10.0, 0.1]);
        let wall = boxed(1, Category::Wall, [0.0, 0.0, 0.0], [5.0, 1.0, 10.0]);
        let g = BuildingGraph::assemble(vec![level, wall], &GraphConfig::default());
        let adjacent: Vec<_> = g
            .edges_of_kind(EdgeKind::Adjacent)
            .map(|e| (e.src.0, e.dst.0))
            .collect();
        assert_eq!(adjacent, vec![(10, 1)]);
    }

    #[test]
    fn adjacency_respects_tolerance() {
        let a = boxed(1, Category::Wall, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let near = boxed(2, Category::Wall, [1.04, 0.0, 0.0], [2.0, 1.0, 1.0]);
        let far = boxed(3, Category::Wall, [1.06, 0.0, 0.0], [2.0, 1.0, 1.0]);

        let g = BuildingGraph::assemble(vec![a.clone(), near], &GraphConfig::default());
        assert_eq!(g.edges_of_kind(EdgeKind::Adjacent).count(), 1);

        let g = BuildingGraph::assemble(vec![a, far], &GraphConfig::default());
        assert_eq!(g.edges_of_kind(EdgeKind::Adjacent).count(), 0);
    }

    #[test]
    fn edges_are_closed_over_nodes() {
        let g = BuildingGraph::assemble(sample_nodes(), &GraphConfig::default());
        for e in g.edges() {
            assert!(g.contains(e.src), "dangling src {}", e.src);
            assert!(g.contains(e.dst), "dangling dst {}", e.dst);
        }
        assert_eq!(g.degree(ElementId(5)), 0);
    }

    #[test]
    fn add_edge_refuses_missing_and_self() {
        let mut g = BuildingGraph::new();
        g.add_node(Node::bare(ElementId(1), Category::Wall));
        assert!(!g.add_edge(ElementId(1), ElementId(2), EdgeKind::Host));
        assert!(!g.add_edge(ElementId(1), ElementId(1), EdgeKind::Adjacent));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn duplicate_nodes_are_ignored() {
        let mut g = BuildingGraph::new();
        assert_eq!(g.add_node(Node::bare(ElementId(1), Category::Wall)), 0);
        assert_eq!(g.add_node(Node::bare(ElementId(1), Category::Floor)), 0);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node(ElementId(1)).unwrap().category, Category::Wall);
    }

    #[test]
    fn neighbors_and_components() {
        let g = BuildingGraph::assemble(sample_nodes(), &GraphConfig::default());
        let mut n: Vec<_> = g.neighbors(ElementId(1)).into_iter().map(|(id, _)| id.0).collect();
        n.sort_unstable();
        assert_eq!(n, vec![2, 3, 3, 100, 100]);
        assert_eq!(g.degree(ElementId(1)), 5);
        assert!(g.neighbors(ElementId(42)).is_empty());

        let components = g.connected_components();
        // {100, 1, 2, 3}, {4}, {5}
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].len(), 4);
    }

    #[test]
    fn kind_names() {
        for kind in [EdgeKind::Host, EdgeKind::Level, EdgeKind::Adjacent] {
            assert_eq!(EdgeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EdgeKind::from_name("parent"), None);
    }
}
