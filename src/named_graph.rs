// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Builds one named graph per dataset (batch),
//! and writes it to the named graphs directory.

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
};

use oxrdf::{
    vocab::{rdf, xsd},
    Graph, IriParseError, LiteralRef, NamedNode, TripleRef,
};
use thiserror::Error;

use crate::{
    artifact::{Artifact, ArtifactError, GraphFormat},
    codec::{CodecError, GraphCodec},
    mapping::{self, MappingError, COL_VIDEO_ID},
    model::{
        dataset::{Dataset, ResourceIris},
        record::{self, EntityRecord, RecordError},
    },
    settings::{RecordPolicy, Settings},
    tools,
    vocab::{flow, schema},
};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to read the records of dataset '{0}': {1}")]
    Records(String, #[source] RecordError),
    #[error("Malformed record in dataset '{0}': {1}")]
    MalformedRecord(String, #[source] MappingError),
    #[error("Vocabulary file '{}' is not a supported graph file: {}", .0.display(), .1)]
    VocabularyFormat(PathBuf, #[source] ArtifactError),
    #[error("Failed to load vocabulary file '{}': {}", .0.display(), .1)]
    Vocabulary(PathBuf, #[source] CodecError),
    #[error("Failed to form the IRI of dataset '{0}': {1}")]
    InvalidDatasetIri(String, #[source] IriParseError),
    #[error("Failed to serialize the graph of dataset '{0}': {1}")]
    Serialize(String, #[source] CodecError),
    #[error("Failed to write graph file '{}': {}", .0.display(), .1)]
    Write(PathBuf, #[source] io::Error),
    #[error("Invalid resource base IRI: {0}")]
    InvalidResourceBase(#[from] IriParseError),
}

/// Turns the records of datasets into named graphs.
///
/// The configured vocabularies are loaded once,
/// and become part of every graph built afterwards.
pub struct NamedGraphBuilder<'a, C: GraphCodec> {
    codec: &'a C,
    iris: ResourceIris,
    on_malformed_record: RecordPolicy,
    vocabularies: Graph,
}

impl<'a, C: GraphCodec> NamedGraphBuilder<'a, C> {
    #[must_use]
    pub fn new(codec: &'a C, iris: ResourceIris, on_malformed_record: RecordPolicy) -> Self {
        Self {
            codec,
            iris,
            on_malformed_record,
            vocabularies: Graph::new(),
        }
    }

    /// Adds the statements of each of the given vocabulary files
    /// to the base of all graphs built afterwards.
    /// Files that do not exist are skipped with a warning.
    ///
    /// Returns the number of files loaded.
    ///
    /// # Errors
    ///
    /// A vocabulary file exists, but is not a graph we can parse.
    pub fn load_vocabularies(&mut self, files: &[PathBuf]) -> Result<usize, BuildError> {
        let mut loaded = 0;
        for file in files {
            if !file.exists() {
                tracing::warn!(
                    "Vocabulary file '{}' not found; continuing without it.",
                    file.display()
                );
                continue;
            }
            let artifact = Artifact::from_file(file.clone())
                .map_err(|err| BuildError::VocabularyFormat(file.clone(), err))?;
            let vocabulary = self
                .codec
                .parse_artifact(&artifact)
                .map_err(|err| BuildError::Vocabulary(file.clone(), err))?;
            tracing::info!(
                "Loaded {} statements from vocabulary file '{}'.",
                vocabulary.len(),
                file.display()
            );
            self.vocabularies.extend(&vocabulary);
            loaded += 1;
        }
        Ok(loaded)
    }

    fn map_unique(
        &self,
        record: &EntityRecord,
        dataset_iri: &NamedNode,
        seen_ids: &mut HashSet<String>,
    ) -> Result<Vec<oxrdf::Triple>, MappingError> {
        let triples = mapping::map_record(record, &self.iris, dataset_iri.as_ref())?;
        if let Some(id) = record.value(COL_VIDEO_ID) {
            if !seen_ids.insert(id.to_owned()) {
                return Err(MappingError::DuplicateIdentifier {
                    row: record.row(),
                    id: id.to_owned(),
                });
            }
        }
        Ok(triples)
    }

    /// Builds the graph of one dataset from its already read records:
    /// the vocabularies, the dataset description and all mapped records.
    ///
    /// # Errors
    ///
    /// - the dataset name does not form a valid IRI
    /// - a record is malformed, and the policy says to fail
    pub fn build(&self, dataset: &Dataset, records: &[EntityRecord]) -> Result<Graph, BuildError> {
        let dataset_iri = self
            .iris
            .dataset(dataset.name())
            .map_err(|err| BuildError::InvalidDatasetIri(dataset.name().to_owned(), err))?;

        let mut graph = self.vocabularies.clone();
        graph.insert(TripleRef::new(dataset_iri.as_ref(), rdf::TYPE, flow::DATASET));
        graph.insert(TripleRef::new(
            dataset_iri.as_ref(),
            schema::NAME,
            LiteralRef::new_typed_literal(dataset.name(), xsd::STRING),
        ));

        let mut seen_ids = HashSet::new();
        let mut skipped = 0_usize;
        for record in records {
            match self.map_unique(record, &dataset_iri, &mut seen_ids) {
                Ok(triples) => {
                    for triple in &triples {
                        graph.insert(triple);
                    }
                }
                Err(err) => match self.on_malformed_record {
                    RecordPolicy::Fail => {
                        return Err(BuildError::MalformedRecord(dataset.name().to_owned(), err));
                    }
                    RecordPolicy::Skip => {
                        tracing::warn!("Dataset '{}': skipping record; {err}", dataset.name());
                        skipped += 1;
                    }
                },
            }
        }
        tracing::info!(
            "Dataset '{}': mapped {} of {} records, resulting in {} statements.",
            dataset.name(),
            records.len() - skipped,
            records.len(),
            graph.len()
        );
        Ok(graph)
    }

    /// Reads the source table of the dataset, and builds its graph.
    ///
    /// # Errors
    ///
    /// - the source table is missing or unreadable
    /// - see [`Self::build`]
    pub fn build_from_source(&self, dataset: &Dataset) -> Result<Graph, BuildError> {
        tracing::info!(
            "Reading dataset '{}' from '{}' ...",
            dataset.name(),
            dataset.source().display()
        );
        let records = record::read_records(dataset.source())
            .map_err(|err| BuildError::Records(dataset.name().to_owned(), err))?;
        self.build(dataset, &records)
    }

    /// Serializes the graph of `dataset` into `dir`,
    /// creating the directory if needed.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Serialization or writing fails.
    pub fn write(
        &self,
        dataset: &Dataset,
        graph: &Graph,
        dir: &Path,
        format: GraphFormat,
    ) -> Result<PathBuf, BuildError> {
        let content = self
            .codec
            .serialize(graph, format)
            .map_err(|err| BuildError::Serialize(dataset.name().to_owned(), err))?;
        let file = dir.join(dataset.graph_file_name(format));
        tools::write_atomically(&file, content).map_err(|err| BuildError::Write(file.clone(), err))?;
        tracing::info!(
            "Wrote graph '{}' ({} statements) to '{}'.",
            dataset.graph_name(),
            graph.len(),
            file.display()
        );
        Ok(file)
    }
}

/// Builds and writes the named graphs of all configured datasets.
///
/// Returns the paths of the written graph files, in order of the dataset names.
///
/// # Errors
///
/// See [`NamedGraphBuilder`]; the first failing dataset aborts the run.
/// All datasets are read and mapped before the first graph file is written,
/// so a failing dataset leaves no new graph files behind.
pub fn run(settings: &Settings) -> Result<Vec<PathBuf>, BuildError> {
    let codec = settings.codec();
    let mut builder = NamedGraphBuilder::new(
        &codec,
        settings.resource_iris()?,
        settings.on_malformed_record,
    );
    builder.load_vocabularies(&settings.ontology_paths())?;

    let built = settings
        .batches()
        .into_iter()
        .map(|dataset| {
            let graph = builder.build_from_source(&dataset)?;
            Ok((dataset, graph))
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    let out_dir = settings.named_graphs_dir();
    let written = built
        .iter()
        .map(|(dataset, graph)| builder.write(dataset, graph, &out_dir, settings.graph_format))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!("Built {} named graphs.", written.len());
    Ok(written)
}
