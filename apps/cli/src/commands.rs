// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `export` and `annotate` subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use annograph_annotate::{read_predictions_file, AnnotationOrchestrator, PassError, PassReport};
use annograph_graph::{build_nodes, write_graph_tables, BuildingGraph, ExportFilter, GraphConfig};
use annograph_model::{Category, MemoryDocument};

/// Options of `annograph export`.
#[derive(Debug)]
pub struct ExportArgs {
    pub snapshot: PathBuf,
    pub out_dir: PathBuf,
    pub categories: Option<Vec<Category>>,
    pub adjacency_tolerance: f64,
}

/// Options of `annograph annotate`.
#[derive(Debug)]
pub struct AnnotateArgs {
    pub snapshot: PathBuf,
    pub predictions: PathBuf,
    pub report: PathBuf,
}

fn load_snapshot(path: &Path) -> Result<MemoryDocument> {
    MemoryDocument::load(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}

/// Builds the element graph and writes the node and edge tables.
pub fn export(args: &ExportArgs) -> Result<()> {
    let doc = load_snapshot(&args.snapshot)?;

    let mut filter = ExportFilter::default();
    if let Some(categories) = &args.categories {
        filter.categories = categories.clone();
    }
    let set = build_nodes(&doc, &filter);
    for (id, err) in &set.skipped {
        eprintln!("skipped element {}: {}", id, err);
    }

    let config = GraphConfig {
        adjacency_tolerance: args.adjacency_tolerance,
    };
    let graph = BuildingGraph::assemble(set.nodes, &config);
    let (nodes_path, edges_path) = write_graph_tables(&graph, &args.out_dir)
        .with_context(|| format!("failed to write tables to {}", args.out_dir.display()))?;

    let (host, level, adjacent) = graph.kind_counts();
    println!(
        "{} nodes -> {}\n{} edges ({} host, {} level, {} adjacent) -> {}",
        graph.node_count(),
        nodes_path.display(),
        graph.edge_count(),
        host,
        level,
        adjacent,
        edges_path.display()
    );
    Ok(())
}

/// Runs an annotation pass and writes the JSON report.
///
/// Returns `Ok(false)` when the pass was aborted; its report is still written.
pub fn annotate(args: &AnnotateArgs) -> Result<bool> {
    let mut doc = load_snapshot(&args.snapshot)?;
    let parsed = read_predictions_file(&args.predictions)
        .with_context(|| format!("failed to read predictions {}", args.predictions.display()))?;
    if parsed.skipped > 0 {
        eprintln!("{} invalid prediction rows skipped", parsed.skipped);
    }

    let mut orchestrator = AnnotationOrchestrator::default();
    match orchestrator.run(&mut doc, &parsed.predictions) {
        Ok(report) => {
            for placement in &report.placements {
                println!(
                    "[{}] {} {} {}: {}",
                    if placement.is_placed() { "ok" } else { "fail" },
                    placement.category,
                    placement.id,
                    placement.kind,
                    placement.reason
                );
            }
            println!("{}", report);
            write_report(&report, &args.report)?;
            Ok(true)
        }
        Err(PassError::Fatal { detail, report }) => {
            eprintln!("annotation pass aborted: {}", detail);
            write_report(&report, &args.report)?;
            Ok(false)
        }
        Err(e) => Err(e).context("annotation pass failed"),
    }
}

fn write_report(report: &PassReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("failed to encode report")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote pass report");
    Ok(())
}
