// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Cell contents that mean "no value",
/// as written by the usual data-frame tooling.
pub const NULL_MARKERS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A",
];

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Dataset file does not exist: '{0}'")]
    MissingFile(PathBuf),
    #[error("Failed to read tabular data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Some I/O problem: '{0}'")]
    Io(#[from] io::Error),
}

/// One row of source tabular data,
/// describing one real-world item (e.g. a video).
///
/// Cells are kept by column name;
/// which columns mean what is decided by [`crate::mapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    row: usize,
    cells: BTreeMap<String, String>,
}

impl EntityRecord {
    /// `row` is the 1-based number of the data row,
    /// not counting the header.
    #[must_use]
    pub fn new<I, K, V>(row: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            row,
            cells: cells
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        }
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns the trimmed value of the given column,
    /// or `None` if the column is missing,
    /// or the cell is empty or a null marker.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|cell| cell.trim())
            .filter(|cell| !NULL_MARKERS.contains(cell))
    }
}

/// Reads all records of a CSV file with a header row.
pub fn read_records(file: &Path) -> Result<Vec<EntityRecord>, RecordError> {
    if !file.is_file() {
        return Err(RecordError::MissingFile(file.to_path_buf()));
    }
    tracing::debug!("Reading records from '{}' ...", file.display());
    read_records_from(File::open(file)?)
}

/// Reads all records from CSV data with a header row.
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<EntityRecord>, RecordError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    csv_reader
        .records()
        .enumerate()
        .map(|(index, record)| -> Result<EntityRecord, RecordError> {
            let record = record?;
            Ok(EntityRecord::new(index + 1, headers.iter().zip(record.iter())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
video_id, video_title_(original) ,publish_year
abc,Some title,2020
def,\"Title, with comma\",NaN
";

    #[test]
    fn reads_rows_by_header() {
        let records = read_records_from(CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row(), 1);
        assert_eq!(records[0].value("video_id"), Some("abc"));
        assert_eq!(records[0].value("video_title_(original)"), Some("Some title"));
        assert_eq!(records[1].value("video_title_(original)"), Some("Title, with comma"));
        assert_eq!(records[1].value("publish_year"), None);
        assert_eq!(records[1].value("no_such_column"), None);
    }

    #[test]
    fn null_markers_are_absent() {
        let record = EntityRecord::new(1, [("a", "  "), ("b", "null"), ("c", " x ")]);
        assert_eq!(record.value("a"), None);
        assert_eq!(record.value("b"), None);
        assert_eq!(record.value("c"), Some("x"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let res = read_records(&dir.path().join("nope.csv"));
        assert!(matches!(res, Err(RecordError::MissingFile(_))));
    }
}
