// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(clippy::shadow_reuse)]

use config::{Config, ConfigError};
use oxrdf::IriParseError;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::{
    artifact::GraphFormat,
    codec::OxCodec,
    inference::InferenceMode,
    model::dataset::{Dataset, ResourceIris},
    vocab,
};

/// File stem of the optional configuration file
/// looked up in the working directory.
pub const CONFIG_FILE_STEM: &str = "config";
/// Prefix of environment variables overriding configuration values,
/// e.g. `FLOW_KG_OUTPUT_DIR=out`.
pub const ENV_PREFIX: &str = "FLOW_KG";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load the basic/low-level configuration data: {0}")]
    Config(#[from] ConfigError),
    #[error("The configured resource base is not a valid IRI: {0}")]
    InvalidResourceBase(#[from] IriParseError),
}

/// What to do with a record that can not be mapped to statements.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordPolicy {
    /// Abort building the batch.
    #[default]
    Fail,
    /// Log a warning and leave the record out.
    Skip,
}

/// What to do with a graph file that can not be parsed while merging.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Abort the whole merge run.
    #[default]
    Fail,
    /// Log a warning and leave the graph out of both merged graph and index.
    Skip,
}

mod defaults {
    use super::{BTreeMap, PathBuf};
    use crate::vocab;

    pub fn data_dir() -> PathBuf {
        PathBuf::from("data")
    }

    pub fn ontology_dir() -> PathBuf {
        PathBuf::from("ontology")
    }

    pub fn output_dir() -> PathBuf {
        PathBuf::from("graphs")
    }

    pub fn validation_dir() -> PathBuf {
        PathBuf::from("validation")
    }

    pub fn ontology_files() -> Vec<String> {
        vec!["provenance_ontology.ttl".to_owned(), "schema.ttl".to_owned()]
    }

    pub fn datasets() -> BTreeMap<String, PathBuf> {
        ["first_batch", "second_batch", "third_batch", "fourth_batch"]
            .into_iter()
            .map(|batch| {
                (
                    batch.to_owned(),
                    PathBuf::from(format!("{batch}_metadata_preprocessed.csv")),
                )
            })
            .collect()
    }

    pub fn namespace_prefixes() -> BTreeMap<String, String> {
        vocab::DEFAULT_PREFIXES
            .into_iter()
            .map(|(prefix, ns)| (prefix.to_owned(), ns.to_owned()))
            .collect()
    }

    pub fn resource_base() -> String {
        "http://flow.ai/".to_owned()
    }

    pub fn shapes_file() -> PathBuf {
        PathBuf::from("shacl_shapes.ttl")
    }
}

/// Everything a pipeline stage needs to know about its environment.
///
/// Relative paths are relative to the working directory,
/// except for dataset sources (relative to [`Self::data_dir`]),
/// ontology files (relative to [`Self::ontology_dir`])
/// and the shapes file (relative to [`Self::validation_dir`]).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct Settings {
    /// Where the source tables are
    #[serde(default = "defaults::data_dir")]
    #[builder(default = defaults::data_dir(), setter(into))]
    pub data_dir: PathBuf,
    /// Where the shared vocabulary files are
    #[serde(default = "defaults::ontology_dir")]
    #[builder(default = defaults::ontology_dir(), setter(into))]
    pub ontology_dir: PathBuf,
    /// Where the named graphs, the merged graph and the index are written to
    #[serde(default = "defaults::output_dir")]
    #[builder(default = defaults::output_dir(), setter(into))]
    pub output_dir: PathBuf,
    /// Where the shapes are read from and the reports are written to
    #[serde(default = "defaults::validation_dir")]
    #[builder(default = defaults::validation_dir(), setter(into))]
    pub validation_dir: PathBuf,
    /// Vocabulary files loaded into every named graph, if they exist
    #[serde(default = "defaults::ontology_files")]
    #[builder(default = defaults::ontology_files())]
    pub ontology_files: Vec<String>,
    /// Batch name -> source table
    #[serde(default = "defaults::datasets")]
    #[builder(default = defaults::datasets())]
    pub datasets: BTreeMap<String, PathBuf>,
    /// Prefix -> namespace, bound when serializing graphs
    #[serde(default = "defaults::namespace_prefixes")]
    #[builder(default = defaults::namespace_prefixes())]
    pub namespace_prefixes: BTreeMap<String, String>,
    /// Base of the IRIs minted for videos, datasets and graphs
    #[serde(default = "defaults::resource_base")]
    #[builder(default = defaults::resource_base(), setter(into))]
    pub resource_base: String,
    #[serde(default)]
    #[builder(default)]
    pub graph_format: GraphFormat,
    #[serde(default = "defaults::shapes_file")]
    #[builder(default = defaults::shapes_file(), setter(into))]
    pub shapes_file: PathBuf,
    #[serde(default)]
    #[builder(default)]
    pub inference: InferenceMode,
    #[serde(default)]
    #[builder(default)]
    pub on_malformed_record: RecordPolicy,
    #[serde(default)]
    #[builder(default)]
    pub on_unparsable_graph: ParsePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Settings {
    /// Creates settings with all directories below `root`,
    /// keeping the default layout.
    #[must_use]
    pub fn rooted_at(root: &Path) -> Self {
        Self::builder()
            .data_dir(root.join(defaults::data_dir()))
            .ontology_dir(root.join(defaults::ontology_dir()))
            .output_dir(root.join(defaults::output_dir()))
            .validation_dir(root.join(defaults::validation_dir()))
            .build()
    }

    #[must_use]
    pub fn named_graphs_dir(&self) -> PathBuf {
        self.output_dir.join("named_graphs")
    }

    #[must_use]
    pub fn merged_graph_file(&self) -> PathBuf {
        self.output_dir
            .join(format!("merged_graph.{}", self.graph_format.extension()))
    }

    #[must_use]
    pub fn graph_index_file(&self) -> PathBuf {
        self.output_dir.join("graph_index.json")
    }

    #[must_use]
    pub fn shapes_path(&self) -> PathBuf {
        self.validation_dir.join(&self.shapes_file)
    }

    #[must_use]
    pub fn batch_report_file(&self) -> PathBuf {
        self.validation_dir
            .join(format!("validation_report.{}", self.graph_format.extension()))
    }

    #[must_use]
    pub fn global_report_file(&self) -> PathBuf {
        self.validation_dir.join(format!(
            "global_validation_report.{}",
            self.graph_format.extension()
        ))
    }

    #[must_use]
    pub fn ontology_paths(&self) -> Vec<PathBuf> {
        self.ontology_files
            .iter()
            .map(|file| self.ontology_dir.join(file))
            .collect()
    }

    /// The configured batches, in order of their names.
    #[must_use]
    pub fn batches(&self) -> Vec<Dataset> {
        self.datasets
            .iter()
            .map(|(batch, source)| Dataset::new(batch.as_str(), self.data_dir.join(source)))
            .collect()
    }

    pub fn resource_iris(&self) -> Result<ResourceIris, IriParseError> {
        ResourceIris::new(self.resource_base.as_str())
    }

    #[must_use]
    pub fn codec(&self) -> OxCodec {
        OxCodec::new(
            self.namespace_prefixes
                .iter()
                .map(|(prefix, ns)| (prefix.as_str(), ns.as_str())),
        )
    }
}

/// Loads the settings, layering (later ones win):
///
/// 1. built-in defaults
/// 2. `config.{yml,toml,json,...}` in the working directory, if present
/// 3. `config_file`, if given
/// 4. environment variables prefixed with `FLOW_KG_`
///    (nested keys separated by `__`)
///
/// # Errors
///
/// - the config loader fails to build
/// - a given config file does not exist
/// - settings failed to deserialize
/// - the resource base is not a valid IRI
pub fn load(config_file: Option<&Path>) -> Result<Settings, SettingsError> {
    let mut settings_loader =
        Config::builder().add_source(config::File::with_name(CONFIG_FILE_STEM).required(false));
    if let Some(config_file) = config_file {
        settings_loader = settings_loader.add_source(config::File::from(config_file));
    }
    let settings = settings_loader
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    tracing::debug!("{settings:#?}");

    settings.resource_iris()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_standard_layout() {
        let settings = Settings::default();

        assert_eq!(settings.named_graphs_dir(), Path::new("graphs/named_graphs"));
        assert_eq!(settings.merged_graph_file(), Path::new("graphs/merged_graph.ttl"));
        assert_eq!(settings.graph_index_file(), Path::new("graphs/graph_index.json"));
        assert_eq!(settings.shapes_path(), Path::new("validation/shacl_shapes.ttl"));
        assert_eq!(
            settings.batch_report_file(),
            Path::new("validation/validation_report.ttl")
        );
        assert_eq!(
            settings.global_report_file(),
            Path::new("validation/global_validation_report.ttl")
        );
        assert_eq!(settings.inference, InferenceMode::Rdfs);
        assert_eq!(settings.on_malformed_record, RecordPolicy::Fail);
        assert_eq!(settings.on_unparsable_graph, ParsePolicy::Fail);

        let batches: Vec<_> = settings.batches().into_iter().map(|d| d.name().to_owned()).collect();
        assert_eq!(batches, ["first_batch", "fourth_batch", "second_batch", "third_batch"]);
        assert_eq!(
            settings.batches()[0].source(),
            Path::new("data/first_batch_metadata_preprocessed.csv")
        );
    }

    #[test]
    fn loads_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("flow-kg.yml");
        std::fs::write(
            &config_file,
            "\
output_dir: out
inference: none
on_unparsable_graph: skip
datasets:
  batch_x: batch_x.csv
",
        )
        .unwrap();

        let settings = load(Some(&config_file)).unwrap();

        assert_eq!(settings.output_dir, Path::new("out"));
        assert_eq!(settings.data_dir, Path::new("data"));
        assert_eq!(settings.inference, InferenceMode::None);
        assert_eq!(settings.on_unparsable_graph, ParsePolicy::Skip);
        assert_eq!(settings.datasets.len(), 1);
        assert_eq!(settings.batches()[0].source(), Path::new("data/batch_x.csv"));
    }

    #[test]
    fn invalid_resource_base_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("flow-kg.toml");
        std::fs::write(&config_file, "resource_base = \"not an iri\"\n").unwrap();

        assert!(matches!(
            load(Some(&config_file)),
            Err(SettingsError::InvalidResourceBase(_))
        ));
    }
}
