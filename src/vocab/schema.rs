// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! [schema.org](https://schema.org/) vocabulary.

use super::named_node;

pub const NS_BASE: &str = "http://schema.org/";
pub const NS_PREFERRED_PREFIX: &str = "schema";

named_node!(NAME, NS_BASE, "name", "The name of the item.");
