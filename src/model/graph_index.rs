// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use oxrdf::{Graph, TermRef};
use serde::{Deserialize, Serialize};

use crate::vocab::flow;

/// A publish year, as written to and read back from the graphs.
pub type PublishYear = i32;

/// The lowest and highest publish year found in a graph.
///
/// Serializes as a two element array,
/// with `null` for both bounds if no year was found.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange(pub Option<PublishYear>, pub Option<PublishYear>);

impl YearRange {
    /// Scans all `flow:publishYear` statements of the graph.
    /// Values that are not plain integers are ignored.
    #[must_use]
    pub fn of_graph(graph: &Graph) -> Self {
        let years = graph
            .triples_for_predicate(flow::PUBLISH_YEAR)
            .filter_map(|triple| match triple.object {
                TermRef::Literal(literal) => literal.value().trim().parse::<PublishYear>().ok(),
                _ => None,
            });
        Self::from_years(years)
    }

    #[must_use]
    pub fn from_years<I: IntoIterator<Item = PublishYear>>(years: I) -> Self {
        years.into_iter().fold(Self::default(), |range, year| {
            Self(
                Some(range.0.map_or(year, |min| min.min(year))),
                Some(range.1.map_or(year, |max| max.max(year))),
            )
        })
    }

    #[must_use]
    pub const fn min(&self) -> Option<PublishYear> {
        self.0
    }

    #[must_use]
    pub const fn max(&self) -> Option<PublishYear> {
        self.1
    }
}

/// Metadata about one named graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GraphIndexEntry {
    /// Name of the file the graph was loaded from
    pub graph_file: String,
    /// Number of statements in the graph
    pub triples: usize,
    pub year_range: YearRange,
    /// When this entry was generated
    pub last_updated: DateTime<Utc>,
}

impl GraphIndexEntry {
    #[must_use]
    pub fn compute<F: Into<String>>(graph_file: F, graph: &Graph, generated_at: DateTime<Utc>) -> Self {
        Self {
            graph_file: graph_file.into(),
            triples: graph.len(),
            year_range: YearRange::of_graph(graph),
            last_updated: generated_at,
        }
    }
}

/// Maps the IRI of each named graph to its metadata.
///
/// Keys are kept sorted, so the serialized index is stable.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct GraphIndex {
    entries: BTreeMap<String, GraphIndexEntry>,
}

impl GraphIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, graph_iri: K, entry: GraphIndexEntry) {
        self.entries.insert(graph_iri.into(), entry);
    }

    #[must_use]
    pub fn get(&self, graph_iri: &str) -> Option<&GraphIndexEntry> {
        self.entries.get(graph_iri)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GraphIndexEntry)> {
        self.entries.iter()
    }

    /// Human-readable JSON, indented by four spaces.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        buffer.push(b'\n');
        Ok(buffer)
    }
}
