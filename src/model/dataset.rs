// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use oxrdf::{IriParseError, NamedNode};

use crate::{artifact::GraphFormat, tools};

/// Prefix of the names of per-batch graphs,
/// and thus also of their files.
pub const GRAPH_NAME_PREFIX: &str = "graph_";

/// A named batch of entity records, sourced from one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    name: String,
    source: PathBuf,
}

impl Dataset {
    #[must_use]
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, source: P) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The name of the graph built from this dataset,
    /// e.g. "graph_first_batch".
    #[must_use]
    pub fn graph_name(&self) -> String {
        format!("{GRAPH_NAME_PREFIX}{}", self.name)
    }

    #[must_use]
    pub fn graph_file_name(&self, format: GraphFormat) -> String {
        format!("{}.{}", self.graph_name(), format.extension())
    }
}

/// Mints the IRIs of the resources we describe,
/// all below one common base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIris {
    base: String,
}

impl ResourceIris {
    /// # Errors
    ///
    /// - the base is not an absolute IRI
    pub fn new<B: Into<String>>(base: B) -> Result<Self, IriParseError> {
        let mut base = base.into();
        if !base.ends_with('/') && !base.ends_with('#') {
            base.push('/');
        }
        NamedNode::new(base.as_str())?;
        Ok(Self { base })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn mint(&self, kind: &str, local: &str) -> Result<NamedNode, IriParseError> {
        NamedNode::new(format!("{}{kind}/{}", self.base, tools::url_encode(local)))
    }

    pub fn video(&self, id: &str) -> Result<NamedNode, IriParseError> {
        self.mint("video", id)
    }

    pub fn dataset(&self, batch_name: &str) -> Result<NamedNode, IriParseError> {
        self.mint("dataset", batch_name)
    }

    /// The identity of a named graph,
    /// as used for keys in the graph index.
    pub fn graph(&self, graph_name: &str) -> Result<NamedNode, IriParseError> {
        self.mint("graph", graph_name)
    }
}

impl Default for ResourceIris {
    fn default() -> Self {
        Self {
            base: "http://flow.ai/".to_owned(),
        }
    }
}
