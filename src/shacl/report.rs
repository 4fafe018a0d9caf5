// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr};

use oxrdf::{vocab::rdf, BlankNode, Graph, Literal, NamedNode, Term, TripleRef};
use shacl_validation::validation_report::{
    report::ValidationReport as ShaclReport, result::ValidationResult as ShaclResult,
};
use srdf::{Object, Rdf, SHACLPath, SRDFGraph};

use super::ShaclError;
use crate::vocab::sh;

/// E.g. "MinCountConstraintComponent" for `sh:MinCountConstraintComponent`
fn local_name(iri: &NamedNode) -> &str {
    iri.as_str().strip_prefix(sh::NS_BASE).unwrap_or(iri.as_str())
}

/// Moves a term of the validation engine into our RDF model,
/// through its N-Triples form.
fn term(object: &Object) -> Result<Term, ShaclError> {
    let engine_term: <SRDFGraph as Rdf>::Term = object.clone().into();
    let ntriples = engine_term.to_string();
    Term::from_str(&ntriples).map_err(|source| ShaclError::Term {
        term: ntriples,
        source,
    })
}

fn named_node(object: &Object) -> Result<NamedNode, ShaclError> {
    match term(object)? {
        Term::NamedNode(node) => Ok(node),
        other => Err(ShaclError::NotAnIri(other.to_string())),
    }
}

fn iri(iri: &str) -> Result<NamedNode, ShaclError> {
    NamedNode::new(iri).map_err(|source| ShaclError::InvalidIri {
        iri: iri.to_owned(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPath {
    Predicate(NamedNode),
    /// Sequence, alternative, inverse and repetition paths, in SHACL path notation
    Complex(String),
}

impl fmt::Display for ResultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(predicate) => write!(f, "{predicate}"),
            Self::Complex(path) => f.write_str(path),
        }
    }
}

impl From<&SHACLPath> for ResultPath {
    fn from(path: &SHACLPath) -> Self {
        match path {
            SHACLPath::Predicate { pred } => NamedNode::new(pred.as_str())
                .map_or_else(|_| Self::Complex(path.to_string()), Self::Predicate),
            complex => Self::Complex(complex.to_string()),
        }
    }
}

/// One failed check of one constraint on one focus node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub focus_node: Term,
    pub result_path: Option<ResultPath>,
    /// The offending value node, if the constraint is checked per value
    pub value: Option<Term>,
    pub source_shape: Option<Term>,
    pub component: NamedNode,
    pub severity: NamedNode,
    pub message: Option<String>,
}

impl ValidationResult {
    fn from_shacl(result: &ShaclResult) -> Result<Self, ShaclError> {
        Ok(Self {
            focus_node: term(result.focus_node())?,
            result_path: result.path().map(ResultPath::from),
            value: result.value().map(term).transpose()?,
            source_shape: result.source().map(term).transpose()?,
            component: named_node(result.component())?,
            severity: iri(result.severity().to_iri().as_str())?,
            message: result.message().map(ToOwned::to_owned),
        })
    }

    fn sort_key(&self) -> [String; 5] {
        fn render<T: ToString>(part: Option<&T>) -> String {
            part.map(ToString::to_string).unwrap_or_default()
        }
        [
            self.focus_node.to_string(),
            render(self.result_path.as_ref()),
            self.component.to_string(),
            render(self.value.as_ref()),
            render(self.source_shape.as_ref()),
        ]
    }
}

/// The outcome of validating one data graph against one shapes graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// Sorts the results, so reports of the same input are identical.
    #[must_use]
    pub fn new(mut results: Vec<ValidationResult>) -> Self {
        results.sort_by_cached_key(ValidationResult::sort_key);
        results.dedup();
        Self { results }
    }

    /// Takes over the results found by the `shacl_validation` engine.
    ///
    /// # Errors
    ///
    /// A result refers to a term that is not valid RDF 1.1.
    pub fn from_shacl(report: &ShaclReport) -> Result<Self, ShaclError> {
        let results = report
            .results()
            .iter()
            .map(ValidationResult::from_shacl)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(results))
    }

    /// Whether the data graph produced no results at all,
    /// regardless of their severity.
    #[must_use]
    pub fn conforms(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Expresses this report in the W3C SHACL results vocabulary.
    ///
    /// Blank node labels are derived from the result positions,
    /// so the graph serializes the same on every run.
    /// Complex result paths only show in the text rendering.
    #[must_use]
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report = BlankNode::new_unchecked("report");
        graph.insert(TripleRef::new(report.as_ref(), rdf::TYPE, sh::VALIDATION_REPORT));
        graph.insert(TripleRef::new(
            report.as_ref(),
            sh::CONFORMS,
            Literal::from(self.conforms()).as_ref(),
        ));
        for (index, result) in self.results.iter().enumerate() {
            let node = BlankNode::new_unchecked(format!("result{index}"));
            graph.insert(TripleRef::new(report.as_ref(), sh::RESULT, node.as_ref()));
            graph.insert(TripleRef::new(node.as_ref(), rdf::TYPE, sh::VALIDATION_RESULT));
            graph.insert(TripleRef::new(node.as_ref(), sh::FOCUS_NODE, result.focus_node.as_ref()));
            if let Some(ResultPath::Predicate(predicate)) = &result.result_path {
                graph.insert(TripleRef::new(node.as_ref(), sh::RESULT_PATH, predicate.as_ref()));
            }
            if let Some(value) = &result.value {
                graph.insert(TripleRef::new(node.as_ref(), sh::VALUE, value.as_ref()));
            }
            if let Some(source_shape) = &result.source_shape {
                graph.insert(TripleRef::new(node.as_ref(), sh::SOURCE_SHAPE, source_shape.as_ref()));
            }
            graph.insert(TripleRef::new(
                node.as_ref(),
                sh::SOURCE_CONSTRAINT_COMPONENT,
                result.component.as_ref(),
            ));
            graph.insert(TripleRef::new(node.as_ref(), sh::RESULT_SEVERITY, result.severity.as_ref()));
            if let Some(message) = &result.message {
                graph.insert(TripleRef::new(
                    node.as_ref(),
                    sh::RESULT_MESSAGE,
                    Literal::new_simple_literal(message).as_ref(),
                ));
            }
        }
        graph
    }

    /// The human-readable rendering, as printed on the console.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Report")?;
        writeln!(
            f,
            "Conforms: {}",
            if self.conforms() { "True" } else { "False" }
        )?;
        if self.conforms() {
            return Ok(());
        }
        writeln!(f, "Results ({}):", self.results.len())?;
        for result in &self.results {
            writeln!(
                f,
                "Constraint {} in {} ({}):",
                local_name(&result.severity),
                local_name(&result.component),
                result.component.as_str()
            )?;
            writeln!(f, "\tSeverity: sh:{}", local_name(&result.severity))?;
            if let Some(source_shape) = &result.source_shape {
                writeln!(f, "\tSource Shape: {source_shape}")?;
            }
            writeln!(f, "\tFocus Node: {}", result.focus_node)?;
            if let Some(value) = &result.value {
                writeln!(f, "\tValue Node: {value}")?;
            }
            if let Some(path) = &result.result_path {
                writeln!(f, "\tResult Path: {path}")?;
            }
            if let Some(message) = &result.message {
                writeln!(f, "\tMessage: {message}")?;
            }
        }
        Ok(())
    }
}
