// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! [PROV-O](https://www.w3.org/TR/prov-o/) vocabulary.

use super::named_node;

pub const NS_BASE: &str = "http://www.w3.org/ns/prov#";
pub const NS_PREFERRED_PREFIX: &str = "prov";

named_node!(
    WAS_DERIVED_FROM,
    NS_BASE,
    "wasDerivedFrom",
    "A derivation is a transformation of an entity into another."
);
