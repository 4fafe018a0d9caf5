// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! RDFS entailment, materialized into a copy of the data graph
//! before shapes are checked against it.

use std::borrow::Cow;

use oxrdf::{
    vocab::{rdf, rdfs},
    Graph, NamedNodeRef, SubjectRef, TermRef, Triple,
};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::tools::as_subject;

/// Which entailment to apply to a data graph before validation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InferenceMode {
    /// Validate the graph as it is.
    None,
    /// Materialize the RDFS entailments first.
    #[default]
    Rdfs,
}

impl InferenceMode {
    /// Returns the graph to validate:
    /// the input itself, or an expanded copy of it.
    #[must_use]
    pub fn apply(self, graph: &Graph) -> Cow<'_, Graph> {
        match self {
            Self::None => Cow::Borrowed(graph),
            Self::Rdfs => Cow::Owned(rdfs_closure(graph)),
        }
    }
}

fn as_predicate(subject: SubjectRef<'_>) -> Option<NamedNodeRef<'_>> {
    if let SubjectRef::NamedNode(node) = subject {
        Some(node)
    } else {
        None
    }
}

fn as_class(term: TermRef<'_>) -> Option<TermRef<'_>> {
    match term {
        TermRef::NamedNode(_) | TermRef::BlankNode(_) => Some(term),
        _ => None,
    }
}

/// Derives all statements entailed by one application of the rules
/// rdfs2 (domain), rdfs3 (range), rdfs5 + rdfs7 (sub-property)
/// and rdfs9 + rdfs11 (sub-class).
fn entailed_once(graph: &Graph) -> Vec<Triple> {
    let mut entailed = Vec::new();

    // rdfs2
    for axiom in graph.triples_for_predicate(rdfs::DOMAIN) {
        let (Some(property), Some(class)) = (as_predicate(axiom.subject), as_class(axiom.object)) else {
            continue;
        };
        for statement in graph.triples_for_predicate(property) {
            entailed.push(Triple::new(statement.subject.into_owned(), rdf::TYPE, class.into_owned()));
        }
    }
    // rdfs3; literals can not be typed
    for axiom in graph.triples_for_predicate(rdfs::RANGE) {
        let (Some(property), Some(class)) = (as_predicate(axiom.subject), as_class(axiom.object)) else {
            continue;
        };
        for statement in graph.triples_for_predicate(property) {
            if let Some(object) = as_subject(statement.object) {
                entailed.push(Triple::new(object.into_owned(), rdf::TYPE, class.into_owned()));
            }
        }
    }
    // rdfs5 + rdfs7
    for axiom in graph.triples_for_predicate(rdfs::SUB_PROPERTY_OF) {
        let (Some(sub), TermRef::NamedNode(sup)) = (as_predicate(axiom.subject), axiom.object) else {
            continue;
        };
        for statement in graph.triples_for_predicate(sub) {
            entailed.push(Triple::new(
                statement.subject.into_owned(),
                sup.into_owned(),
                statement.object.into_owned(),
            ));
        }
        for sup_axiom in graph.triples_for_subject(sup) {
            if sup_axiom.predicate == rdfs::SUB_PROPERTY_OF {
                entailed.push(Triple::new(
                    sub.into_owned(),
                    rdfs::SUB_PROPERTY_OF,
                    sup_axiom.object.into_owned(),
                ));
            }
        }
    }
    // rdfs9 + rdfs11
    for axiom in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
        let (Some(sub), Some(sup)) = (as_subject(axiom.subject.into()), as_class(axiom.object)) else {
            continue;
        };
        for instance in graph.subjects_for_predicate_object(rdf::TYPE, sub) {
            entailed.push(Triple::new(instance.into_owned(), rdf::TYPE, sup.into_owned()));
        }
        if let Some(sup_subject) = as_subject(sup) {
            for sup_sup in graph.objects_for_subject_predicate(sup_subject, rdfs::SUB_CLASS_OF) {
                entailed.push(Triple::new(
                    sub.into_owned(),
                    rdfs::SUB_CLASS_OF,
                    sup_sup.into_owned(),
                ));
            }
        }
    }
    entailed
}

/// Returns a copy of `graph`, extended by everything it RDFS-entails
/// (without the axiomatic triples).
#[must_use]
pub fn rdfs_closure(graph: &Graph) -> Graph {
    let mut closure = graph.clone();
    loop {
        let size_before = closure.len();
        for triple in entailed_once(&closure) {
            closure.insert(&triple);
        }
        if closure.len() == size_before {
            break;
        }
    }
    tracing::debug!(
        "RDFS inference added {} statements to the data graph.",
        closure.len() - graph.len()
    );
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{flow, prov};
    use oxrdf::{NamedNode, TripleRef};

    const ENTITY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/prov#Entity");
    const THING: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://flow.ai/schema/Thing");
    const LINKED: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://flow.ai/schema/linked");

    fn video() -> NamedNode {
        NamedNode::new_unchecked("http://flow.ai/video/v1")
    }

    fn dataset() -> NamedNode {
        NamedNode::new_unchecked("http://flow.ai/dataset/batch_x")
    }

    #[test]
    fn sub_classes_propagate_types_transitively() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(flow::VIDEO, rdfs::SUB_CLASS_OF, ENTITY));
        graph.insert(TripleRef::new(ENTITY, rdfs::SUB_CLASS_OF, THING));
        graph.insert(&Triple::new(video(), rdf::TYPE, flow::VIDEO));

        let closure = rdfs_closure(&graph);

        assert!(closure.contains(&Triple::new(video(), rdf::TYPE, ENTITY)));
        assert!(closure.contains(&Triple::new(video(), rdf::TYPE, THING)));
        assert!(closure.contains(TripleRef::new(flow::VIDEO, rdfs::SUB_CLASS_OF, THING)));
        assert!(graph.len() < closure.len());
    }

    #[test]
    fn domain_and_range_type_subjects_and_objects() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(flow::BELONGS_TO_DATASET, rdfs::DOMAIN, flow::VIDEO));
        graph.insert(TripleRef::new(flow::BELONGS_TO_DATASET, rdfs::RANGE, flow::DATASET));
        graph.insert(TripleRef::new(flow::TITLE, rdfs::RANGE, flow::DATASET));
        graph.insert(&Triple::new(video(), flow::BELONGS_TO_DATASET, dataset()));
        graph.insert(&Triple::new(video(), flow::TITLE, oxrdf::Literal::new_simple_literal("t")));

        let closure = rdfs_closure(&graph);

        assert!(closure.contains(&Triple::new(video(), rdf::TYPE, flow::VIDEO)));
        assert!(closure.contains(&Triple::new(dataset(), rdf::TYPE, flow::DATASET)));
        assert_eq!(
            closure.subjects_for_predicate_object(rdf::TYPE, flow::DATASET).count(),
            1
        );
    }

    #[test]
    fn sub_properties_copy_statements() {
        let mut graph = Graph::new();
        graph.insert(TripleRef::new(flow::BELONGS_TO_DATASET, rdfs::SUB_PROPERTY_OF, prov::WAS_DERIVED_FROM));
        graph.insert(TripleRef::new(prov::WAS_DERIVED_FROM, rdfs::SUB_PROPERTY_OF, LINKED));
        graph.insert(&Triple::new(video(), flow::BELONGS_TO_DATASET, dataset()));

        let closure = rdfs_closure(&graph);

        assert!(closure.contains(&Triple::new(video(), prov::WAS_DERIVED_FROM, dataset())));
        assert!(closure.contains(&Triple::new(video(), LINKED, dataset())));
    }

    #[test]
    fn none_mode_borrows_the_input() {
        let graph = Graph::new();
        assert!(matches!(InferenceMode::None.apply(&graph), Cow::Borrowed(_)));
    }
}
