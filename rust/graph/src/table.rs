// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node and edge tables.
//!
//! Comma-separated text with one header row and a fixed column order. Absent
//! values are empty cells. Floats use the shortest representation that parses
//! back to the same value. String cells are sanitized on write (`,` becomes
//! `;`, line breaks become spaces), so every row splits on `,` unambiguously.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use annograph_model::{BoundingBox, Category, ElementId};
use nalgebra::Vector3;

use crate::error::{Result, TableError};
use crate::graph::{BuildingGraph, EdgeKind, GraphEdge};
use crate::node::Node;

/// File name of the node table inside an export directory.
pub const NODES_FILE: &str = "nodes.csv";
/// File name of the edge table inside an export directory.
pub const EDGES_FILE: &str = "edges.csv";

pub const NODE_COLUMNS: [&str; 27] = [
    "id",
    "category",
    "family",
    "type",
    "level_id",
    "host_id",
    "min_x",
    "min_y",
    "min_z",
    "max_x",
    "max_y",
    "max_z",
    "center_x",
    "center_y",
    "center_z",
    "length",
    "height",
    "thickness",
    "area",
    "width",
    "depth",
    "direction_x",
    "direction_y",
    "direction_z",
    "room_name",
    "room_number",
    "level_elevation",
];

pub const EDGE_COLUMNS: [&str; 3] = ["src", "dst", "type"];

/// Replaces the separator and line breaks in a string cell.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ',' => ';',
            '\r' | '\n' => ' ',
            c => c,
        })
        .collect()
}

fn write_row<W: Write>(out: &mut W, cells: &[String]) -> std::io::Result<()> {
    writeln!(out, "{}", cells.join(","))
}

fn opt_id(id: Option<ElementId>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

fn float(v: f64) -> String {
    format!("{}", v)
}

/// Writes the node table, header first.
pub fn write_nodes<W: Write>(out: &mut W, nodes: &[Node]) -> Result<()> {
    write_row(out, &NODE_COLUMNS.map(String::from))?;
    for node in nodes {
        let mut cells = Vec::with_capacity(NODE_COLUMNS.len());
        cells.push(node.id.to_string());
        cells.push(node.category.as_str().to_string());
        cells.push(sanitize(&node.family));
        cells.push(sanitize(&node.type_name));
        cells.push(opt_id(node.level_id));
        cells.push(opt_id(node.host_id));

        match &node.bounding_box {
            Some(b) => {
                let c = b.center();
                for v in [b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z, c.x, c.y, c.z] {
                    cells.push(float(v));
                }
            }
            None => cells.extend(std::iter::repeat(String::new()).take(9)),
        }

        for v in [
            node.length,
            node.height,
            node.thickness,
            node.area,
            node.width,
            node.depth,
        ] {
            cells.push(float(v));
        }

        match node.direction {
            Some(d) => cells.extend([float(d.x), float(d.y), float(d.z)]),
            None => cells.extend(std::iter::repeat(String::new()).take(3)),
        }

        cells.push(sanitize(&node.room_name));
        cells.push(sanitize(&node.room_number));
        cells.push(float(node.level_elevation));
        write_row(out, &cells)?;
    }
    Ok(())
}

/// Writes the edge table, header first.
pub fn write_edges<W: Write>(out: &mut W, edges: &[GraphEdge]) -> Result<()> {
    write_row(out, &EDGE_COLUMNS.map(String::from))?;
    for edge in edges {
        write_row(
            out,
            &[
                edge.src.to_string(),
                edge.dst.to_string(),
                edge.kind.as_str().to_string(),
            ],
        )?;
    }
    Ok(())
}

/// Writes `nodes.csv` and `edges.csv` into `dir`, creating it if needed.
pub fn write_graph_tables(graph: &BuildingGraph, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)?;
    let nodes_path = dir.join(NODES_FILE);
    let edges_path = dir.join(EDGES_FILE);

    let mut out = BufWriter::new(File::create(&nodes_path)?);
    write_nodes(&mut out, graph.nodes())?;
    out.flush()?;

    let mut out = BufWriter::new(File::create(&edges_path)?);
    write_edges(&mut out, graph.edges())?;
    out.flush()?;

    tracing::info!(
        nodes = %nodes_path.display(),
        edges = %edges_path.display(),
        "Wrote graph tables"
    );
    Ok((nodes_path, edges_path))
}

/// Reads a table with the given header.
///
/// Returns each data row as `(line number, cells)`, 1-based with the header
/// on line 1. Blank lines are skipped. Rows with a wrong cell count are
/// rejected.
pub fn read_table<R: BufRead>(input: R, columns: &[&str]) -> Result<Vec<(usize, Vec<String>)>> {
    let mut lines = input.lines();
    let expected = columns.join(",");
    let header = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    let found = header.trim_start_matches('\u{feff}').trim_end();
    if found != expected {
        return Err(TableError::Header {
            expected,
            found: found.to_string(),
        }
        .into());
    }

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        let line_no = i + 2;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<String> = line.split(',').map(String::from).collect();
        if cells.len() != columns.len() {
            return Err(row_error(
                line_no,
                format!("expected {} cells, found {}", columns.len(), cells.len()),
            )
            .into());
        }
        rows.push((line_no, cells));
    }
    Ok(rows)
}

fn row_error(line: usize, message: impl Into<String>) -> TableError {
    TableError::Row {
        line,
        message: message.into(),
    }
}

/// Cell parser bound to one row.
struct Cells<'a> {
    line: usize,
    cells: &'a [String],
}

impl<'a> Cells<'a> {
    /// Trimmed cell, for ids, numbers and names.
    fn raw(&self, idx: usize) -> &'a str {
        self.cells[idx].trim()
    }

    /// Free-text cell, read back exactly as written.
    fn text(&self, idx: usize) -> String {
        self.cells[idx].clone()
    }

    fn parse<T: FromStr>(&self, idx: usize) -> std::result::Result<T, TableError> {
        let raw = self.raw(idx);
        raw.parse().map_err(|_| {
            row_error(
                self.line,
                format!("invalid {} '{}'", NODE_COLUMNS.get(idx).copied().unwrap_or("cell"), raw),
            )
        })
    }

    fn optional<T: FromStr>(&self, idx: usize) -> std::result::Result<Option<T>, TableError> {
        if self.raw(idx).is_empty() {
            Ok(None)
        } else {
            self.parse(idx).map(Some)
        }
    }

    /// Three consecutive float cells, all empty or all present.
    fn triple(&self, idx: usize) -> std::result::Result<Option<[f64; 3]>, TableError> {
        let values = [
            self.optional::<f64>(idx)?,
            self.optional::<f64>(idx + 1)?,
            self.optional::<f64>(idx + 2)?,
        ];
        match values {
            [Some(x), Some(y), Some(z)] => Ok(Some([x, y, z])),
            [None, None, None] => Ok(None),
            _ => Err(row_error(
                self.line,
                format!("partially empty '{}' group", NODE_COLUMNS[idx]),
            )),
        }
    }
}

fn parse_node_row(line: usize, cells: &[String]) -> std::result::Result<Node, TableError> {
    let row = Cells { line, cells };
    let category = Category::from_name(row.raw(1))
        .ok_or_else(|| row_error(line, format!("unknown category '{}'", row.raw(1))))?;

    let mut node = Node::bare(row.parse(0)?, category);
    node.family = row.text(2);
    node.type_name = row.text(3);
    node.level_id = row.optional(4)?;
    node.host_id = row.optional(5)?;
    node.bounding_box = match (row.triple(6)?, row.triple(9)?) {
        (Some(min), Some(max)) => Some(BoundingBox::from_coords(min, max)),
        (None, None) => None,
        _ => return Err(row_error(line, "bounding box has only one corner")),
    };
    node.length = row.parse(15)?;
    node.height = row.parse(16)?;
    node.thickness = row.parse(17)?;
    node.area = row.parse(18)?;
    node.width = row.parse(19)?;
    node.depth = row.parse(20)?;
    node.direction = row.triple(21)?.map(Vector3::from);
    node.room_name = row.text(24);
    node.room_number = row.text(25);
    node.level_elevation = row.parse(26)?;
    Ok(node)
}

/// Parses a node table. The center columns are derived and not read back.
pub fn parse_nodes<R: BufRead>(input: R) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    for (line, cells) in read_table(input, &NODE_COLUMNS)? {
        nodes.push(parse_node_row(line, &cells)?);
    }
    Ok(nodes)
}

/// Parses an edge table.
pub fn parse_edges<R: BufRead>(input: R) -> Result<Vec<GraphEdge>> {
    let mut edges = Vec::new();
    for (line, cells) in read_table(input, &EDGE_COLUMNS)? {
        let id = |idx: usize| -> std::result::Result<ElementId, TableError> {
            cells[idx]
                .trim()
                .parse()
                .map_err(|_| row_error(line, format!("invalid {} '{}'", EDGE_COLUMNS[idx], cells[idx])))
        };
        let kind = EdgeKind::from_name(&cells[2])
            .ok_or_else(|| row_error(line, format!("unknown edge type '{}'", cells[2].trim())))?;
        edges.push(GraphEdge {
            src: id(0)?,
            dst: id(1)?,
            kind,
        });
    }
    Ok(edges)
}

/// Opens `path` and parses it as a node table.
pub fn read_nodes_file(path: &Path) -> Result<Vec<Node>> {
    parse_nodes(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::GraphConfig;
    use approx::assert_relative_eq;

    fn sample_nodes() -> Vec<Node> {
        let mut wall = Node::bare(ElementId(1), Category::Wall);
        wall.family = "Basic Wall".into();
        wall.type_name = "Exterior, Brick\non CMU".into();
        wall.level_id = Some(ElementId(10));
        wall.bounding_box = Some(BoundingBox::from_coords([0.1, 0.0, 0.0], [20.0, 0.66, 10.0]));
        wall.length = 20.0;
        wall.height = 10.0;
        wall.thickness = 0.656168;
        wall.direction = Some(Vector3::new(0.6, 0.8, 0.0));
        wall.level_elevation = 3.3;

        let mut room = Node::bare(ElementId(4), Category::Room);
        room.room_name = "Office".into();
        room.room_number = "101".into();
        room.area = 150.123456789;

        let level = Node::bare(ElementId(10), Category::Level);
        vec![wall, room, level]
    }

    fn round_trip(nodes: &[Node]) -> Vec<Node> {
        let mut buf = Vec::new();
        write_nodes(&mut buf, nodes).unwrap();
        parse_nodes(buf.as_slice()).unwrap()
    }

    #[test]
    fn node_header_and_cells() {
        let mut buf = Vec::new();
        write_nodes(&mut buf, &sample_nodes()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id,category,family,type,level_id,host_id,min_x"));
        assert!(lines[0].ends_with("room_name,room_number,level_elevation"));
        for line in &lines {
            assert_eq!(line.split(',').count(), NODE_COLUMNS.len());
        }
        assert!(lines[1].starts_with("1,Walls,Basic Wall,Exterior; Brick on CMU,10,,0.1,"));
        // Level row: no box, no direction.
        assert!(lines[3].starts_with("10,Levels,Unknown,Unknown,,,,,,,,,,,,0,"));
    }

    #[test]
    fn node_round_trip() {
        let original = sample_nodes();
        let parsed = round_trip(&original);
        assert_eq!(parsed.len(), original.len());

        let wall = &parsed[0];
        assert_eq!(wall.id, ElementId(1));
        assert_eq!(wall.category, Category::Wall);
        // Lossy substitution only.
        assert_eq!(wall.type_name, "Exterior; Brick on CMU");
        assert_eq!(wall.level_id, Some(ElementId(10)));
        assert_eq!(wall.host_id, None);
        let (a, b) = (wall.bounding_box.unwrap(), original[0].bounding_box.unwrap());
        assert_relative_eq!(a.min, b.min, epsilon = 1e-6);
        assert_relative_eq!(a.max, b.max, epsilon = 1e-6);
        assert_relative_eq!(wall.thickness, 0.656168, epsilon = 1e-6);
        assert_relative_eq!(wall.direction.unwrap(), Vector3::new(0.6, 0.8, 0.0), epsilon = 1e-6);
        assert_relative_eq!(wall.level_elevation, 3.3, epsilon = 1e-6);

        assert_eq!(parsed[1], original[1]);
        assert_eq!(parsed[2], original[2]);
    }

    #[test]
    fn free_text_keeps_surrounding_whitespace() {
        let mut room = Node::bare(ElementId(4), Category::Room);
        room.family = " Room".into();
        room.room_name = " Office ".into();
        room.room_number = "101 ".into();
        let parsed = round_trip(&[room.clone()]);
        assert_eq!(parsed[0].family, " Room");
        assert_eq!(parsed[0].room_name, " Office ");
        assert_eq!(parsed[0].room_number, "101 ");
        assert_eq!(parsed[0], room);
    }

    #[test]
    fn edge_round_trip() {
        let mut nodes = sample_nodes();
        nodes[1].bounding_box = Some(BoundingBox::from_coords([5.0, 0.0, 0.0], [6.0, 6.0, 9.0]));
        nodes[1].level_id = Some(ElementId(10));
        let graph = BuildingGraph::assemble(nodes, &GraphConfig::default());

        let mut buf = Vec::new();
        write_edges(&mut buf, graph.edges()).unwrap();
        assert!(buf.starts_with(b"src,dst,type\n"));
        let parsed = parse_edges(buf.as_slice()).unwrap();
        assert_eq!(parsed, graph.edges());
        assert!(parsed.iter().any(|e| e.kind == EdgeKind::Adjacent));
    }

    #[test]
    fn rejects_wrong_header() {
        let err = parse_edges("source,target,type\n1,2,host\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Table(TableError::Header { .. })));
        assert!(matches!(
            parse_nodes("".as_bytes()).unwrap_err(),
            Error::Table(TableError::Header { .. })
        ));
    }

    #[test]
    fn reports_bad_row_line() {
        let err = parse_edges("src,dst,type\n1,2,host\n\n3,x,level\n".as_bytes()).unwrap_err();
        match err {
            Error::Table(TableError::Row { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_edges("src,dst,type\n1,2,parent\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Table(TableError::Row { line: 2, .. })));

        let err = parse_edges("src,dst,type\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Table(TableError::Row { line: 2, .. })));
    }

    #[test]
    fn crlf_input() {
        let parsed = parse_edges("src,dst,type\r\n1,2,host\r\n".as_bytes()).unwrap();
        assert_eq!(parsed[0].kind, EdgeKind::Host);
    }

    #[test]
    fn sanitize_cells() {
        assert_eq!(sanitize("a,b\r\nc"), "a;b  c");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn writes_both_files() {
        let dir = std::env::temp_dir().join(format!("annograph-tables-{}", std::process::id()));
        let graph = BuildingGraph::assemble(sample_nodes(), &GraphConfig::default());
        let (nodes_path, edges_path) = write_graph_tables(&graph, &dir).unwrap();
        assert_eq!(read_nodes_file(&nodes_path).unwrap().len(), 3);
        assert!(edges_path.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
