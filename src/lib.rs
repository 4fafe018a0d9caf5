// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod artifact;
pub mod codec;
pub mod files_finder;
pub mod inference;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod named_graph;
pub mod settings;
pub mod shacl;
pub mod tools;
pub mod validation;
pub mod vocab;

use git_version::git_version;

// This tests rust code in the README with doc-tests.
// Though, It will not appear in the generated documentation.
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;

pub const VERSION: &str = git_version!(cargo_prefix = "", fallback = "unknown");
