// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annotation-class predictions and their interpretation.
//!
//! | class | dimension | text |
//! |-------|-----------|------|
//! | 0     |           |      |
//! | 1     | yes       |      |
//! | 2     |           | yes  |
//! | 3     | yes       | yes  |

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use annograph_graph::{read_table, TableError};
use annograph_model::ElementId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const PREDICTION_COLUMNS: [&str; 4] =
    ["node_id", "predicted_class", "confidence", "annotation_type"];

/// What a classification code asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationNeed {
    None,
    Dimension,
    Text,
    Both,
}

impl AnnotationNeed {
    /// Interprets a class code. Codes outside `0..=3` have no meaning.
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(AnnotationNeed::None),
            1 => Some(AnnotationNeed::Dimension),
            2 => Some(AnnotationNeed::Text),
            3 => Some(AnnotationNeed::Both),
            _ => None,
        }
    }

    #[inline]
    pub fn needs_dimension(&self) -> bool {
        matches!(self, AnnotationNeed::Dimension | AnnotationNeed::Both)
    }

    #[inline]
    pub fn needs_text(&self) -> bool {
        matches!(self, AnnotationNeed::Text | AnnotationNeed::Both)
    }
}

/// One row of the prediction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub node_id: ElementId,
    pub need: AnnotationNeed,
    pub confidence: f64,
    pub annotation_type: String,
}

impl PredictionRecord {
    /// Builds a record, `None` for an unknown class or a confidence outside
    /// `[0, 1]`.
    pub fn new(
        node_id: ElementId,
        class: u8,
        confidence: f64,
        annotation_type: impl Into<String>,
    ) -> Option<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return None;
        }
        Some(Self {
            node_id,
            need: AnnotationNeed::from_class(class)?,
            confidence,
            annotation_type: annotation_type.into(),
        })
    }

    /// Class code of the record's need.
    pub fn class(&self) -> u8 {
        match self.need {
            AnnotationNeed::None => 0,
            AnnotationNeed::Dimension => 1,
            AnnotationNeed::Text => 2,
            AnnotationNeed::Both => 3,
        }
    }
}

/// Predictions keyed by node id. A missing key excludes the element from
/// annotation.
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    records: FxHashMap<ElementId, PredictionRecord>,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the one it replaces.
    pub fn insert(&mut self, record: PredictionRecord) -> Option<PredictionRecord> {
        self.records.insert(record.node_id, record)
    }

    pub fn get(&self, id: ElementId) -> Option<&PredictionRecord> {
        self.records.get(&id)
    }

    /// Need for `id`, `None` when there is no prediction.
    pub fn need(&self, id: ElementId) -> Option<AnnotationNeed> {
        self.get(id).map(|r| r.need)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.values()
    }
}

impl FromIterator<PredictionRecord> for PredictionSet {
    fn from_iter<I: IntoIterator<Item = PredictionRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Parsed prediction table.
#[derive(Debug, Default)]
pub struct ParsedPredictions {
    pub predictions: PredictionSet,
    /// Rows dropped for an out-of-range class or confidence.
    pub skipped: usize,
}

/// Parses a prediction table.
///
/// Rows with an unknown class or a confidence outside `[0, 1]` are skipped
/// and counted. Cells that do not parse as numbers are errors. A repeated
/// node id keeps the last row.
pub fn parse_predictions<R: BufRead>(input: R) -> Result<ParsedPredictions> {
    let mut parsed = ParsedPredictions::default();

    for (line, cells) in read_table(input, &PREDICTION_COLUMNS)? {
        let cell = |idx: usize| cells[idx].trim();
        let invalid = |idx: usize| {
            annograph_graph::Error::from(TableError::Row {
                line,
                message: format!("invalid {} '{}'", PREDICTION_COLUMNS[idx], cell(idx)),
            })
        };

        let node_id: ElementId = cell(0).parse().map_err(|_| invalid(0))?;
        let class: i64 = cell(1).parse().map_err(|_| invalid(1))?;
        let confidence: f64 = cell(2).parse().map_err(|_| invalid(2))?;

        let record = u8::try_from(class)
            .ok()
            .and_then(|class| PredictionRecord::new(node_id, class, confidence, cell(3)));
        match record {
            Some(record) => {
                if parsed.predictions.insert(record).is_some() {
                    tracing::debug!(line, id = %node_id, "Duplicate prediction replaced");
                }
            }
            None => {
                tracing::warn!(line, id = %node_id, class, confidence, "Skipping invalid prediction");
                parsed.skipped += 1;
            }
        }
    }

    tracing::info!(
        predictions = parsed.predictions.len(),
        skipped = parsed.skipped,
        "Parsed prediction table"
    );
    Ok(parsed)
}

/// Opens `path` and parses it as a prediction table.
pub fn read_predictions_file(path: &Path) -> Result<ParsedPredictions> {
    parse_predictions(BufReader::new(File::open(path)?))
}
