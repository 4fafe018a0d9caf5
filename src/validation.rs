// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Validates either the union of all named graphs
//! or the merged graph against the shapes,
//! and writes the resulting report.

use std::{
    io,
    path::{Path, PathBuf},
};

use oxrdf::Graph;
use thiserror::Error;

use crate::{
    artifact::{Artifact, ArtifactError, GraphFormat},
    codec::{CodecError, GraphCodec},
    files_finder::{self, FindError},
    inference::InferenceMode,
    merge,
    settings::Settings,
    shacl::{ShaclError, ShaclValidator, ShapeValidator, ValidationReport},
    tools,
};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Shapes file not found: '{}'", .0.display())]
    MissingShapes(PathBuf),
    #[error("Merged graph not found: '{}'; it is produced by the merge step", .0.display())]
    MissingMergedGraph(PathBuf),
    #[error("Not a supported graph file: {0}")]
    Artifact(#[from] ArtifactError),
    #[error("Failed to discover the named graph files: {0}")]
    Discovery(#[from] FindError),
    #[error("Failed to parse the shapes graph: {0}")]
    ParseShapes(#[source] CodecError),
    #[error("Failed to parse data graph '{0}': {1}")]
    ParseData(String, #[source] CodecError),
    #[error("Failed to validate: {0}")]
    Shacl(#[from] ShaclError),
    #[error("Failed to serialize the validation report: {0}")]
    Serialize(#[source] CodecError),
    #[error("Failed to write the validation report to '{}': {}", .0.display(), .1)]
    Write(PathBuf, #[source] io::Error),
}

/// What to validate.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// The union of these named graphs
    Batches(Vec<Artifact>),
    /// The already merged graph
    Merged(Artifact),
}

/// The verdict plus its two renderings.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub conforms: bool,
    pub report_graph: Graph,
    pub report_text: String,
}

impl From<&ValidationReport> for ValidationOutcome {
    fn from(report: &ValidationReport) -> Self {
        Self {
            conforms: report.conforms(),
            report_graph: report.to_graph(),
            report_text: report.to_text(),
        }
    }
}

pub struct Validator<'a, C: GraphCodec, V: ShapeValidator> {
    codec: &'a C,
    shape_validator: &'a V,
    inference: InferenceMode,
}

impl<'a, C: GraphCodec, V: ShapeValidator> Validator<'a, C, V> {
    #[must_use]
    pub const fn new(codec: &'a C, shape_validator: &'a V, inference: InferenceMode) -> Self {
        Self {
            codec,
            shape_validator,
            inference,
        }
    }

    fn parse_data(&self, artifact: &Artifact) -> Result<Graph, ValidationError> {
        self.codec
            .parse_artifact(artifact)
            .map_err(|err| ValidationError::ParseData(artifact.name().to_owned(), err))
    }

    /// Loads the data graph to validate.
    ///
    /// # Errors
    ///
    /// A data graph fails to parse.
    pub fn load_data(&self, source: &DataSource) -> Result<Graph, ValidationError> {
        match source {
            DataSource::Batches(artifacts) => {
                let mut data = Graph::new();
                for artifact in artifacts {
                    merge::union_into(&mut data, &self.parse_data(artifact)?);
                }
                tracing::info!(
                    "Loaded {} named graphs with {} statements in total.",
                    artifacts.len(),
                    data.len()
                );
                Ok(data)
            }
            DataSource::Merged(artifact) => {
                let data = self.parse_data(artifact)?;
                tracing::info!(
                    "Loaded merged graph '{}' with {} statements.",
                    artifact.name(),
                    data.len()
                );
                Ok(data)
            }
        }
    }

    /// Validates the data against the shapes.
    ///
    /// # Errors
    ///
    /// - data or shapes fail to parse
    /// - the shapes can not be interpreted
    pub fn validate(&self, source: &DataSource, shapes: &Artifact) -> Result<ValidationOutcome, ValidationError> {
        let data = self.load_data(source)?;
        let shapes_graph = self
            .codec
            .parse_artifact(shapes)
            .map_err(ValidationError::ParseShapes)?;
        tracing::info!(
            "Validating against '{}' (inference: {}) ...",
            shapes.name(),
            self.inference
        );
        let report = self
            .shape_validator
            .validate(&data, &shapes_graph, self.inference)?;
        Ok(ValidationOutcome::from(&report))
    }
}

fn shapes_artifact(settings: &Settings) -> Result<Artifact, ValidationError> {
    let shapes_file = settings.shapes_path();
    if !shapes_file.is_file() {
        return Err(ValidationError::MissingShapes(shapes_file));
    }
    Ok(Artifact::from_file(shapes_file)?)
}

fn write_report<C: GraphCodec>(
    codec: &C,
    outcome: &ValidationOutcome,
    file: &Path,
    format: GraphFormat,
) -> Result<(), ValidationError> {
    let content = codec
        .serialize(&outcome.report_graph, format)
        .map_err(ValidationError::Serialize)?;
    tools::write_atomically(file, content).map_err(|err| ValidationError::Write(file.to_path_buf(), err))?;
    tracing::info!(
        "Validation report written to '{}'; conforms: {}.",
        file.display(),
        outcome.conforms
    );
    Ok(())
}

fn run_on<V: ShapeValidator>(
    settings: &Settings,
    shape_validator: &V,
    source: &DataSource,
    report_file: &Path,
) -> Result<ValidationOutcome, ValidationError> {
    let shapes = shapes_artifact(settings)?;
    let codec = settings.codec();
    let validator = Validator::new(&codec, shape_validator, settings.inference);
    let outcome = validator.validate(source, &shapes)?;
    write_report(&codec, &outcome, report_file, settings.graph_format)?;
    Ok(outcome)
}

/// Validates the union of all named graphs,
/// and writes the report to the per-batch report file.
///
/// # Errors
///
/// - the shapes file or the named graphs directory is missing
/// - see [`Validator::validate`]
/// - the report can not be written
pub fn run_per_batch(settings: &Settings) -> Result<ValidationOutcome, ValidationError> {
    let artifacts =
        files_finder::find_graph_artifacts(settings.named_graphs_dir(), settings.graph_format)?;
    if artifacts.is_empty() {
        tracing::warn!(
            "No named graphs found in '{}'; validating an empty graph.",
            settings.named_graphs_dir().display()
        );
    }
    run_on(
        settings,
        &ShaclValidator,
        &DataSource::Batches(artifacts),
        &settings.batch_report_file(),
    )
}

/// Validates the merged graph,
/// and writes the report to the global report file.
///
/// # Errors
///
/// - the shapes file or the merged graph is missing
/// - see [`Validator::validate`]
/// - the report can not be written
pub fn run_global(settings: &Settings) -> Result<ValidationOutcome, ValidationError> {
    let merged_file = settings.merged_graph_file();
    if !merged_file.is_file() {
        return Err(ValidationError::MissingMergedGraph(merged_file));
    }
    run_on(
        settings,
        &ShaclValidator,
        &DataSource::Merged(Artifact::from_file(merged_file)?),
        &settings.global_report_file(),
    )
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::codec::OxCodec;

    /// Accepts everything, remembering what it was asked to check.
    #[derive(Default)]
    struct RecordingValidator {
        data_len: Cell<usize>,
        inference: Cell<Option<InferenceMode>>,
    }

    impl ShapeValidator for RecordingValidator {
        fn validate(
            &self,
            data: &Graph,
            _shapes: &Graph,
            inference: InferenceMode,
        ) -> Result<ValidationReport, ShaclError> {
            self.data_len.set(data.len());
            self.inference.set(Some(inference));
            Ok(ValidationReport::default())
        }
    }

    const SHAPES: &str = r#"
@prefix sh: <http://www.w3.org/ns/shacl#> .
@prefix flow: <http://flow.ai/schema/> .
<http://flow.ai/shapes/VideoShape> a sh:NodeShape ;
    sh:targetClass flow:Video ;
    sh:property [ sh:path flow:title ; sh:minCount 1 ] .
"#;

    fn artifact(name: &str, content: &str) -> Artifact {
        Artifact::from_bytes(name, GraphFormat::Turtle, content)
    }

    #[test]
    fn batches_are_united_before_validation() {
        let codec = OxCodec::default();
        let recorder = RecordingValidator::default();
        let validator = Validator::new(&codec, &recorder, InferenceMode::None);
        let source = DataSource::Batches(vec![
            artifact("graph_a.ttl", "<http://a> <http://p> <http://b> ."),
            artifact("graph_b.ttl", "<http://a> <http://p> <http://b> .\n<http://c> <http://p> <http://d> ."),
        ]);

        let outcome = validator.validate(&source, &artifact("shapes.ttl", SHAPES)).unwrap();

        assert!(outcome.conforms);
        assert_eq!(recorder.data_len.get(), 2);
        assert_eq!(recorder.inference.get(), Some(InferenceMode::None));
    }

    #[test]
    fn unparsable_data_is_fatal() {
        let codec = OxCodec::default();
        let recorder = RecordingValidator::default();
        let validator = Validator::new(&codec, &recorder, InferenceMode::Rdfs);
        let source = DataSource::Merged(artifact("merged_graph.ttl", "<http://a> <http://p"));

        let err = validator
            .validate(&source, &artifact("shapes.ttl", SHAPES))
            .unwrap_err();
        assert!(matches!(err, ValidationError::ParseData(name, _) if name == "merged_graph.ttl"));
    }

    #[test]
    fn violations_are_reported_not_raised() {
        let codec = OxCodec::default();
        let validator = Validator::new(&codec, &ShaclValidator, InferenceMode::Rdfs);
        let source = DataSource::Merged(artifact(
            "merged_graph.ttl",
            "<http://flow.ai/video/v2> a <http://flow.ai/schema/Video> .",
        ));

        let outcome = validator.validate(&source, &artifact("shapes.ttl", SHAPES)).unwrap();

        assert!(!outcome.conforms);
        assert!(outcome.report_text.contains("Focus Node: <http://flow.ai/video/v2>"));
        assert!(outcome
            .report_text
            .contains("MinCountConstraintComponent"));
        assert!(outcome.report_graph.len() > 2);
    }

    #[test]
    fn missing_shapes_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::rooted_at(dir.path());
        std::fs::create_dir_all(settings.named_graphs_dir()).unwrap();

        assert!(matches!(
            run_per_batch(&settings),
            Err(ValidationError::MissingShapes(_))
        ));
    }

    #[test]
    fn missing_merged_graph_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::rooted_at(dir.path());

        assert!(matches!(
            run_global(&settings),
            Err(ValidationError::MissingMergedGraph(_))
        ));
    }

    #[test]
    fn write_error_names_the_file_and_the_cause() {
        let err = ValidationError::Write(
            PathBuf::from("validation/validation_report.ttl"),
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to write the validation report to 'validation/validation_report.ttl': read-only"
        );
    }

    #[test]
    fn global_run_writes_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::rooted_at(dir.path());
        std::fs::create_dir_all(&settings.validation_dir).unwrap();
        std::fs::write(settings.shapes_path(), SHAPES).unwrap();
        std::fs::create_dir_all(&settings.output_dir).unwrap();
        std::fs::write(
            settings.merged_graph_file(),
            "<http://flow.ai/video/v1> a <http://flow.ai/schema/Video> ; <http://flow.ai/schema/title> \"T\" .",
        )
        .unwrap();

        let outcome = run_global(&settings).unwrap();

        assert!(outcome.conforms);
        assert_eq!(outcome.report_text, "Validation Report\nConforms: True\n");
        let report = std::fs::read_to_string(settings.global_report_file()).unwrap();
        assert!(report.contains("ValidationReport"));
    }
}
