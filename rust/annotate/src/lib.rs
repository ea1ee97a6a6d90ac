// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # annograph annotate
//!
//! Annotate path of a pass. Predicted annotation classes are interpreted per
//! element, a planner per category computes where a dimension or text note
//! goes in the active view, and the [`AnnotationOrchestrator`] places every
//! request inside one transaction that is either committed whole or rolled
//! back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use annograph_annotate::{parse_predictions, AnnotationOrchestrator};
//! use annograph_model::MemoryDocument;
//!
//! let mut doc = MemoryDocument::load("model.json")?;
//! let parsed = parse_predictions(std::io::BufReader::new(std::fs::File::open("predictions.csv")?))?;
//! let report = AnnotationOrchestrator::default().run(&mut doc, &parsed.predictions)?;
//! println!("{}", report);
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod orchestrator;
pub mod planner;
pub mod prediction;
pub mod report;

pub use config::PlacementConfig;
pub use content::text_content;
pub use error::{Error, PassError, PlacementError, Result};
pub use orchestrator::{AnnotationOrchestrator, CancelFlag, TRANSACTION_NAME};
pub use planner::{submit, Plan, PlacementContext};
pub use prediction::{
    parse_predictions, read_predictions_file, AnnotationNeed, ParsedPredictions, PredictionRecord,
    PredictionSet, PREDICTION_COLUMNS,
};
pub use report::{Outcome, PassReport, PassState, PlacementOutcome};
