// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Unites all named graphs into one graph,
//! and indexes what each of them contributed.

use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use oxrdf::{Graph, IriParseError};
use thiserror::Error;

use crate::{
    artifact::Artifact,
    codec::{CodecError, GraphCodec},
    files_finder::{self, FindError},
    model::{
        dataset::ResourceIris,
        graph_index::{GraphIndex, GraphIndexEntry},
    },
    settings::{ParsePolicy, Settings},
    tools,
};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Failed to discover the named graph files: {0}")]
    Discovery(#[from] FindError),
    #[error("Failed to parse graph '{0}': {1}")]
    Parse(String, #[source] CodecError),
    #[error("Failed to form the IRI of graph '{0}': {1}")]
    InvalidGraphIri(String, #[source] IriParseError),
    #[error("Failed to serialize the merged graph: {0}")]
    Serialize(#[source] CodecError),
    #[error("Failed to serialize the graph index: {0}")]
    SerializeIndex(#[from] serde_json::Error),
    #[error("Failed to write '{}': {}", .0.display(), .1)]
    Write(PathBuf, #[source] io::Error),
    #[error("Invalid resource base IRI: {0}")]
    InvalidResourceBase(#[from] IriParseError),
}

/// Adds all statements of `other` to `target`.
/// Statements already present are not duplicated.
pub fn union_into(target: &mut Graph, other: &Graph) {
    target.extend(other);
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub merged: Graph,
    pub index: GraphIndex,
}

pub struct GraphMerger<'a, C: GraphCodec> {
    codec: &'a C,
    iris: &'a ResourceIris,
    on_unparsable_graph: ParsePolicy,
}

impl<'a, C: GraphCodec> GraphMerger<'a, C> {
    #[must_use]
    pub const fn new(codec: &'a C, iris: &'a ResourceIris, on_unparsable_graph: ParsePolicy) -> Self {
        Self {
            codec,
            iris,
            on_unparsable_graph,
        }
    }

    /// Parses each artifact, and unites them all into one graph,
    /// indexing each of them under its graph IRI.
    ///
    /// All index entries share `generated_at` as their update time.
    ///
    /// # Errors
    ///
    /// - an artifact fails to parse, and the policy says to fail
    /// - an artifact name does not form a valid graph IRI
    pub fn merge(&self, artifacts: &[Artifact], generated_at: DateTime<Utc>) -> Result<MergeOutcome, MergeError> {
        let mut merged = Graph::new();
        let mut index = GraphIndex::new();
        for artifact in artifacts {
            let graph = match self.codec.parse_artifact(artifact) {
                Ok(graph) => graph,
                Err(err) => match self.on_unparsable_graph {
                    ParsePolicy::Fail => return Err(MergeError::Parse(artifact.name().to_owned(), err)),
                    ParsePolicy::Skip => {
                        tracing::warn!("Skipping unparsable graph '{}': {err}", artifact.name());
                        continue;
                    }
                },
            };
            let graph_iri = self
                .iris
                .graph(artifact.stem())
                .map_err(|err| MergeError::InvalidGraphIri(artifact.stem().to_owned(), err))?;
            tracing::info!(
                "Merging graph '{}' with {} statements ...",
                artifact.name(),
                graph.len()
            );
            index.insert(
                graph_iri.into_string(),
                GraphIndexEntry::compute(artifact.name(), &graph, generated_at),
            );
            union_into(&mut merged, &graph);
        }
        tracing::info!(
            "Merged {} graphs into one with {} statements.",
            index.len(),
            merged.len()
        );
        Ok(MergeOutcome { merged, index })
    }
}

/// Merges all graph files found in the named graphs directory,
/// and writes the merged graph and the index.
///
/// # Errors
///
/// - the named graphs directory does not exist
/// - see [`GraphMerger::merge`]
/// - writing the outputs fails
pub fn run(settings: &Settings) -> Result<MergeOutcome, MergeError> {
    let codec = settings.codec();
    let iris = settings.resource_iris()?;
    let artifacts =
        files_finder::find_graph_artifacts(settings.named_graphs_dir(), settings.graph_format)?;
    tracing::info!("Found {} named graph files.", artifacts.len());

    let merger = GraphMerger::new(&codec, &iris, settings.on_unparsable_graph);
    let outcome = merger.merge(&artifacts, Utc::now())?;

    let merged_file = settings.merged_graph_file();
    let content = codec
        .serialize(&outcome.merged, settings.graph_format)
        .map_err(MergeError::Serialize)?;
    tools::write_atomically(&merged_file, content).map_err(|err| MergeError::Write(merged_file.clone(), err))?;
    tracing::info!("Wrote merged graph to '{}'.", merged_file.display());

    let index_file = settings.graph_index_file();
    tools::write_atomically(&index_file, outcome.index.to_json_pretty()?)
        .map_err(|err| MergeError::Write(index_file.clone(), err))?;
    tracing::info!("Wrote graph index to '{}'.", index_file.display());

    Ok(outcome)
}
