// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::io;

use oxrdf::{Graph, IriParseError, Triple, TripleRef};
use oxrdfio::{RdfParseError, RdfParser, RdfSerializer};
use thiserror::Error;

use crate::artifact::{Artifact, GraphFormat};

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to parse graph syntax: {0}")]
    Parse(#[from] RdfParseError),
    #[error("Some I/O problem: '{0}'")]
    Io(#[from] io::Error),
    #[error("Invalid namespace prefix IRI: {0}")]
    InvalidPrefix(#[from] IriParseError),
}

/// Reads and writes graphs in their serialized forms.
pub trait GraphCodec {
    /// # Errors
    ///
    /// - the content is not valid syntax of the given format
    fn parse(&self, content: &[u8], format: GraphFormat) -> Result<Graph, CodecError>;

    /// # Errors
    ///
    /// - a namespace prefix is not a valid IRI
    /// - the serializer fails to write
    fn serialize(&self, graph: &Graph, format: GraphFormat) -> Result<Vec<u8>, CodecError>;

    /// Reads the artifact's content and parses it in the artifact's format.
    fn parse_artifact(&self, artifact: &Artifact) -> Result<Graph, CodecError> {
        let content = artifact.content()?;
        self.parse(&content, artifact.format())
    }
}

/// [`GraphCodec`] backed by the `oxrdfio` parsers and serializers.
///
/// Triples are written in lexicographic order of their N-Triples form,
/// so serializing the same graph twice gives the same bytes.
#[derive(Debug, Clone, Default)]
pub struct OxCodec {
    prefixes: Vec<(String, String)>,
}

impl OxCodec {
    #[must_use]
    pub fn new<I, P, N>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = (P, N)>,
        P: Into<String>,
        N: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|(prefix, ns)| (prefix.into(), ns.into()))
                .collect(),
        }
    }
}

impl GraphCodec for OxCodec {
    fn parse(&self, content: &[u8], format: GraphFormat) -> Result<Graph, CodecError> {
        let mut graph = Graph::new();
        // Named graphs of quad formats are flattened into one graph.
        // Fresh blank node labels keep nodes of different documents apart.
        for quad in RdfParser::from_format(format.into())
            .rename_blank_nodes()
            .for_reader(content)
        {
            let quad = quad?;
            graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }

    fn serialize(&self, graph: &Graph, format: GraphFormat) -> Result<Vec<u8>, CodecError> {
        let mut serializer = RdfSerializer::from_format(format.into());
        for (prefix, ns) in &self.prefixes {
            serializer = serializer.with_prefix(prefix.as_str(), ns.as_str())?;
        }
        let mut writer = serializer.for_writer(Vec::new());
        let mut triples: Vec<TripleRef<'_>> = graph.iter().collect();
        triples.sort_by_cached_key(ToString::to_string);
        for triple in triples {
            writer.serialize_triple(triple)?;
        }
        Ok(writer.finish()?)
    }
}
