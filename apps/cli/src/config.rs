// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver configuration loaded from environment variables.

use std::path::PathBuf;

/// Driver configuration. Command-line options override these values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-axis slack for adjacency edges.
    pub adjacency_tolerance: f64,
    /// Directory receiving `nodes.csv` and `edges.csv`.
    pub output_dir: PathBuf,
    /// Path of the JSON pass report.
    pub report_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            adjacency_tolerance: std::env::var("ANNOGRAPH_ADJACENCY_TOLERANCE")
                .unwrap_or_else(|_| "0.05".into())
                .parse()
                .ok()
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(0.05),
            output_dir: std::env::var("ANNOGRAPH_OUTPUT_DIR")
                .unwrap_or_else(|_| "graph".into())
                .into(),
            report_path: std::env::var("ANNOGRAPH_REPORT_PATH")
                .unwrap_or_else(|_| "annotation_report.json".into())
                .into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
