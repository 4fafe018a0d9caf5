// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! RDF vocabularies referenced directly by this crate.
//!
//! Only the terms we actually emit or inspect are listed here;
//! the rest of each vocabulary is opaque to us.
//! RDF, RDFS and XSD terms come from [`oxrdf::vocab`].

pub mod flow;
pub mod prov;
pub mod schema;
pub mod sh;

/// Defines a `pub const` [`oxrdf::NamedNodeRef`]
/// from a namespace base and a local name,
/// with the given description as its doc comment.
macro_rules! named_node {
    ($const_name:ident, $ns_base:expr, $local_name:expr, $description:expr) => {
        #[doc = $description]
        pub const $const_name: oxrdf::NamedNodeRef<'static> =
            oxrdf::NamedNodeRef::new_unchecked(const_format::concatcp!($ns_base, $local_name));
    };
}

pub(crate) use named_node;

/// The prefixes bound by default when serializing graphs.
pub const DEFAULT_PREFIXES: [(&str, &str); 4] = [
    (flow::NS_PREFERRED_PREFIX, flow::NS_BASE),
    (prov::NS_PREFERRED_PREFIX, prov::NS_BASE),
    (schema::NS_PREFERRED_PREFIX, schema::NS_BASE),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_concatenated() {
        assert_eq!(flow::VIDEO.as_str(), "http://flow.ai/schema/Video");
        assert_eq!(
            prov::WAS_DERIVED_FROM.as_str(),
            "http://www.w3.org/ns/prov#wasDerivedFrom"
        );
        assert_eq!(
            sh::MIN_COUNT_CONSTRAINT_COMPONENT.as_str(),
            "http://www.w3.org/ns/shacl#MinCountConstraintComponent"
        );
    }
}
