// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # annograph graph
//!
//! Export path of a pass: each collected element becomes a [`Node`] with
//! attributes derived per category, and the [`BuildingGraph`] connects them
//! with host, level and inferred adjacency edges. Node and edge tables are
//! written in a fixed column order so downstream consumers can parse them
//! back.

pub mod error;
pub mod graph;
pub mod node;
pub mod table;

pub use error::{Error, NodeError, Result, TableError};
pub use graph::{BuildingGraph, EdgeKind, GraphConfig, GraphEdge};
pub use node::{build_nodes, ExportFilter, Node, NodeBuilder, NodeSet};
pub use table::{
    parse_edges, parse_nodes, read_nodes_file, read_table, sanitize, write_edges,
    write_graph_tables, write_nodes, EDGES_FILE, EDGE_COLUMNS, NODES_FILE, NODE_COLUMNS,
};
