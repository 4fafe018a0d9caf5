// SPDX-FileCopyrightText: 2023 - 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! [SHACL](http://www.w3.org/ns/shacl) validation report vocabulary.

use super::named_node;

pub const NS_BASE: &str = "http://www.w3.org/ns/shacl#";
pub const NS_PREFERRED_PREFIX: &str = "sh";

named_node!(VIOLATION, NS_BASE, "Violation", "The severity for a violation validation result.");
named_node!(WARNING, NS_BASE, "Warning", "The severity for a warning validation result.");
named_node!(INFO, NS_BASE, "Info", "The severity for an informational validation result.");

named_node!(VALIDATION_REPORT, NS_BASE, "ValidationReport", "The class of SHACL validation reports.");
named_node!(VALIDATION_RESULT, NS_BASE, "ValidationResult", "The class of validation results.");
named_node!(CONFORMS, NS_BASE, "conforms", "True if the validation did not produce any validation results, and false otherwise.");
named_node!(RESULT, NS_BASE, "result", "The validation results contained in a validation report.");
named_node!(FOCUS_NODE, NS_BASE, "focusNode", "The focus node that was validated when the result was produced.");
named_node!(RESULT_PATH, NS_BASE, "resultPath", "The path of a validation result, based on the path of the validated property shape.");
named_node!(VALUE, NS_BASE, "value", "An RDF node that has caused the result.");
named_node!(SOURCE_SHAPE, NS_BASE, "sourceShape", "The shape that is was validated when the result was produced.");
named_node!(SOURCE_CONSTRAINT_COMPONENT, NS_BASE, "sourceConstraintComponent", "The constraint component that is the source of the result.");
named_node!(RESULT_SEVERITY, NS_BASE, "resultSeverity", "The severity of the result, e.g. warning.");
named_node!(RESULT_MESSAGE, NS_BASE, "resultMessage", "Human-readable messages explaining the cause of the result.");

named_node!(MIN_COUNT_CONSTRAINT_COMPONENT, NS_BASE, "MinCountConstraintComponent", "A constraint component that can be used to restrict the minimum number of value nodes.");
