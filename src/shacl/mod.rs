// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Checks data graphs against SHACL shapes graphs.
//!
//! [`ShaclValidator`] hands both graphs to the native engine
//! of the `shacl_validation` crate,
//! and takes its results over into a [`ValidationReport`].

pub mod report;

use std::io::Cursor;

use oxrdf::{Graph, IriParseError, TermParseError};
use shacl_validation::{
    shacl_processor::{GraphValidation, ShaclProcessor, ShaclValidationMode},
    store::{graph::Graph as DataStore, ShaclDataManager},
};
use srdf::{RDFFormat, ReaderMode, SRDFGraph};
use thiserror::Error;

use crate::{
    artifact::GraphFormat,
    codec::{CodecError, GraphCodec, OxCodec},
    inference::InferenceMode,
};

pub use report::{ResultPath, ValidationReport, ValidationResult};

#[derive(Error, Debug)]
pub enum ShaclError {
    #[error("Failed to hand a graph over to the validation engine: {0}")]
    Serialize(#[from] CodecError),
    #[error("Failed to interpret the shapes: {0}")]
    Shapes(String),
    #[error("Failed to load the data graph into the validation engine: {0}")]
    Data(String),
    #[error("Validation engine failure: {0}")]
    Engine(String),
    #[error("Validation result holds an unreadable term '{term}': {source}")]
    Term {
        term: String,
        #[source]
        source: TermParseError,
    },
    #[error("Validation result holds an invalid IRI '{iri}': {source}")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
    #[error("Validation result holds '{0}' where an IRI is required")]
    NotAnIri(String),
}

/// Checks whether the data conforms to the shapes.
///
/// Implementations must not modify either of the input graphs;
/// entailment is applied to a copy of the data graph.
pub trait ShapeValidator {
    /// Validates `data`, expanded according to `inference`,
    /// against all the shapes defined in `shapes`.
    ///
    /// # Errors
    ///
    /// - the shapes graph does not describe valid SHACL shapes
    /// - the engine fails while evaluating a constraint
    fn validate(
        &self,
        data: &Graph,
        shapes: &Graph,
        inference: InferenceMode,
    ) -> Result<ValidationReport, ShaclError>;
}

/// [`ShapeValidator`] running the native (non-SPARQL) engine
/// of the `shacl_validation` crate on in-memory graphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaclValidator;

fn to_ntriples(graph: &Graph) -> Result<Vec<u8>, ShaclError> {
    Ok(OxCodec::default().serialize(graph, GraphFormat::NTriples)?)
}

impl ShapeValidator for ShaclValidator {
    fn validate(
        &self,
        data: &Graph,
        shapes: &Graph,
        inference: InferenceMode,
    ) -> Result<ValidationReport, ShaclError> {
        let schema = ShaclDataManager::load(
            Cursor::new(to_ntriples(shapes)?),
            RDFFormat::NTriples,
            None,
        )
        .map_err(|err| ShaclError::Shapes(err.to_string()))?;

        let entailed = inference.apply(data);
        tracing::debug!(
            "Handing {} data statements to the validation engine.",
            entailed.len()
        );
        let data_graph = SRDFGraph::from_reader(
            Cursor::new(to_ntriples(&entailed)?),
            &RDFFormat::NTriples,
            None,
            &ReaderMode::Strict,
        )
        .map_err(|err| ShaclError::Data(err.to_string()))?;
        let store =
            DataStore::from_graph(data_graph).map_err(|err| ShaclError::Data(err.to_string()))?;

        let report = GraphValidation::from_graph(store, ShaclValidationMode::Native)
            .validate(&schema)
            .map_err(|err| ShaclError::Engine(err.to_string()))?;
        ValidationReport::from_shacl(&report)
    }
}
