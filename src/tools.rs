// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
};

use oxrdf::{SubjectRef, TermRef};
use urlencoding::encode;

/// Percent-encodes a string,
/// so it can be used as a single path segment of an IRI.
///
/// ```
/// # use flow_kg::tools::url_encode;
/// assert_eq!(url_encode(r#"Hello World"#), "Hello%20World");
/// assert_eq!(url_encode("dQw4w9WgXcQ_-"), "dQw4w9WgXcQ_-");
/// ```
#[must_use]
pub fn url_encode(input: &str) -> Cow<str> {
    encode(input)
}

/// Returns the term as a statement subject,
/// if it is an IRI or a blank node.
#[must_use]
pub const fn as_subject(term: TermRef<'_>) -> Option<SubjectRef<'_>> {
    match term {
        TermRef::NamedNode(node) => Some(SubjectRef::NamedNode(node)),
        TermRef::BlankNode(node) => Some(SubjectRef::BlankNode(node)),
        _ => None,
    }
}

pub fn ensure_dir_exists<P: AsRef<Path>>(dir: P) -> io::Result<()> {
    if !dir.as_ref().exists() {
        tracing::debug!("Creating directory '{}' ...", dir.as_ref().display());
        fs::create_dir_all(dir.as_ref())?;
    }
    Ok(())
}

fn temp_file_path(file: &Path) -> PathBuf {
    let mut file_name = file.file_name().map(ToOwned::to_owned).unwrap_or_default();
    file_name.push(".temp");
    file.with_file_name(file_name)
}

/// Writes the whole content to a temporary sibling of `file`,
/// and then renames it to `file`.
/// A crash in between leaves either the old or the new content in place,
/// never a partially written file.
/// The parent directory is created if it does not yet exist.
pub fn write_atomically<P: AsRef<Path>, C: AsRef<[u8]>>(file: P, content: C) -> io::Result<()> {
    let file = file.as_ref();
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    let temp_file = temp_file_path(file);
    fs::write(&temp_file, content)?;
    fs::rename(temp_file, file)?;
    Ok(())
}
