// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;
use thiserror::Error;

use crate::artifact::{Artifact, ArtifactError, GraphFormat};

#[derive(Error, Debug)]
pub enum FindError {
    #[error(transparent)]
    RegexError(#[from] regex::Error),
    #[error("The directory to search in does not exist: '{0}'")]
    MissingDir(PathBuf),
    #[error("Could not get file type for '{0:?}'")]
    FileType(PathBuf),
    #[error("Path part {0} is not valid UTF-8: '{1:?}'")]
    PathPartNotUtf8(&'static str, OsString),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

fn path_part_to_string(
    path_part_name: &'static str,
    path_part: &OsStr,
) -> Result<String, FindError> {
    path_part
        .to_str()
        .ok_or_else(|| FindError::PathPartNotUtf8(path_part_name, path_part.to_os_string()))
        .map(ToOwned::to_owned)
}

/// Lists the files directly within `dir` (no recursion)
/// whose file-name matches `file_name_pattern`,
/// sorted lexicographically by file-name.
///
/// The fixed order makes everything built from the result
/// reproducible between runs and platforms.
pub fn find_in_dir(dir: impl AsRef<Path>, file_name_pattern: &Regex) -> Result<Vec<PathBuf>, FindError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(FindError::MissingDir(dir.to_path_buf()));
    }
    tracing::trace!("find_in_dir - dir: '{}' ...", dir.display());
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|_err| FindError::FileType(entry_path.clone()))?;
        if !file_type.is_file() {
            continue;
        }
        let file_name = path_part_to_string("file-name", &entry.file_name())?;
        tracing::trace!("find_in_dir - matching file: '{file_name}' ...");
        if file_name_pattern.is_match(&file_name) {
            files.push((file_name, entry_path));
        }
    }
    files.sort_by(|(name_a, _), (name_b, _)| name_a.cmp(name_b));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Builds the pattern matching all file-names with the given extension.
pub fn extension_pattern(extension: &str) -> Result<Regex, FindError> {
    Ok(Regex::new(&format!(r"^.+\.{}$", regex::escape(extension)))?)
}

/// Discovers all serialized graphs of the given format
/// directly within `dir`, in lexicographic order.
pub fn find_graph_artifacts(
    dir: impl AsRef<Path>,
    format: GraphFormat,
) -> Result<Vec<Artifact>, FindError> {
    let dir = dir.as_ref();
    let pattern = extension_pattern(format.extension())?;
    let artifacts = find_in_dir(dir, &pattern)?
        .into_iter()
        .map(Artifact::from_file)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(
        "Found {} graph files in '{}'.",
        artifacts.len(),
        dir.display()
    );
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_only_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["graph_c.ttl", "graph_a.ttl", "notes.txt", "graph_b.ttl", "graph_b.ttl.temp"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.ttl")).unwrap();

        let artifacts = find_graph_artifacts(dir.path(), GraphFormat::Turtle).unwrap();
        let names: Vec<_> = artifacts.iter().map(Artifact::name).collect();

        assert_eq!(names, ["graph_a.ttl", "graph_b.ttl", "graph_c.ttl"]);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = find_graph_artifacts(dir.path().join("nope"), GraphFormat::Turtle);
        assert!(matches!(res, Err(FindError::MissingDir(_))));
    }
}
