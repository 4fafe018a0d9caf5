// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxrdfio::RdfFormat;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};
use strum::{Display, EnumString};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Path is not a file-path or the file has no extension: '{0}'")]
    NoFileExtension(PathBuf),
    #[error("File name or extension is not valid UTF-8: '{0}'")]
    NotUtf8(PathBuf),
    #[error("Unsupported graph file extension '{1}' of file '{0}'")]
    UnsupportedExtension(PathBuf, String),
}

/// Serialization formats for RDF graphs
/// that we read and write.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GraphFormat {
    #[default]
    Turtle,
    NTriples,
    NQuads,
    #[serde(rename = "trig")]
    #[strum(serialize = "trig")]
    TriG,
    N3,
    RdfXml,
}

impl GraphFormat {
    /// The canonical file-extension of this format,
    /// without the leading '.'.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
            Self::NQuads => "nq",
            Self::TriG => "trig",
            Self::N3 => "n3",
            Self::RdfXml => "rdf",
        }
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext.to_lowercase().as_str() {
            "ttl" | "turtle" => Self::Turtle,
            "nt" | "ntriples" => Self::NTriples,
            "nq" | "nquads" => Self::NQuads,
            "trig" => Self::TriG,
            "n3" => Self::N3,
            "rdf" | "owl" | "xml" => Self::RdfXml,
            _ => return None,
        })
    }
}

impl From<GraphFormat> for RdfFormat {
    fn from(value: GraphFormat) -> Self {
        match value {
            GraphFormat::Turtle => Self::Turtle,
            GraphFormat::NTriples => Self::NTriples,
            GraphFormat::NQuads => Self::NQuads,
            GraphFormat::TriG => Self::TriG,
            GraphFormat::N3 => Self::N3,
            GraphFormat::RdfXml => Self::RdfXml,
        }
    }
}

impl TryFrom<&Path> for GraphFormat {
    type Error = ArtifactError;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let file_ext = value
            .extension()
            .ok_or_else(|| ArtifactError::NoFileExtension(value.to_path_buf()))?
            .to_str()
            .ok_or_else(|| ArtifactError::NotUtf8(value.to_path_buf()))?;
        Self::from_extension(file_ext).ok_or_else(|| {
            ArtifactError::UnsupportedExtension(value.to_path_buf(), file_ext.to_owned())
        })
    }
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// A serialized graph, either still on disc or already in memory.
///
/// Merging and validation work on lists of these,
/// so they do not need to know where the graphs come from.
#[derive(Debug, Clone)]
pub struct Artifact {
    name: String,
    format: GraphFormat,
    source: Source,
}

impl Artifact {
    pub fn from_file(file: PathBuf) -> Result<Self, ArtifactError> {
        let format = GraphFormat::try_from(file.as_path())?;
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ArtifactError::NotUtf8(file.clone()))?
            .to_owned();
        Ok(Self {
            name,
            format,
            source: Source::File(file),
        })
    }

    #[must_use]
    pub fn from_bytes<N: Into<String>, C: Into<Vec<u8>>>(
        name: N,
        format: GraphFormat,
        content: C,
    ) -> Self {
        Self {
            name: name.into(),
            format,
            source: Source::Memory(content.into()),
        }
    }

    /// The file name, including the extension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file name without its extension,
    /// which is also the name of the graph.
    #[must_use]
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }

    #[must_use]
    pub const fn format(&self) -> GraphFormat {
        self.format
    }

    #[must_use]
    pub const fn file(&self) -> Option<&PathBuf> {
        match &self.source {
            Source::File(file) => Some(file),
            Source::Memory(_) => None,
        }
    }

    /// Returns the serialized content,
    /// reading it from disc if this artifact is backed by a file.
    pub fn content(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            Source::File(file) => {
                tracing::trace!("Reading graph file '{}' ...", file.display());
                fs::read(file).map(Cow::Owned)
            }
            Source::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_path() {
        assert_eq!(
            GraphFormat::try_from(Path::new("graphs/graph_a.TTL")).unwrap(),
            GraphFormat::Turtle
        );
        assert!(matches!(
            GraphFormat::try_from(Path::new("graph_a.csv")),
            Err(ArtifactError::UnsupportedExtension(_, ext)) if ext == "csv"
        ));
        assert!(matches!(
            GraphFormat::try_from(Path::new("graph_a")),
            Err(ArtifactError::NoFileExtension(_))
        ));
    }

    #[test]
    fn stem_strips_extension() {
        let artifact = Artifact::from_bytes("graph_batch_x.ttl", GraphFormat::Turtle, "");
        assert_eq!(artifact.stem(), "graph_batch_x");
        assert_eq!(artifact.name(), "graph_batch_x.ttl");
        assert!(artifact.file().is_none());
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("n_triples".parse::<GraphFormat>().unwrap(), GraphFormat::NTriples);
        assert_eq!(GraphFormat::RdfXml.to_string(), "rdf_xml");
    }
}
