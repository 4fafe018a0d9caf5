// SPDX-FileCopyrightText: 2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Maps one tabular record onto the RDF statements describing it.
//!
//! Which column ends up as which statement is decided by [`FIELDS`] alone;
//! changing the source schema means changing that table,
//! not the control flow.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime};
use oxrdf::{
    vocab::{rdf, xsd},
    IriParseError, Literal, NamedNodeRef, Triple,
};
use strum::Display;
use thiserror::Error;

use crate::{
    model::{dataset::ResourceIris, graph_index::PublishYear, record::EntityRecord},
    vocab::{flow, prov},
};

pub const COL_VIDEO_ID: &str = "video_id";
pub const COL_TITLE: &str = "video_title_(original)";
pub const COL_DESCRIPTION: &str = "video_description_(original)";
pub const COL_DURATION_MS: &str = "approx_duration_(ms)";
pub const COL_PUBLISH_TIMESTAMP: &str = "video_publish_timestamp";
pub const COL_PUBLISH_YEAR: &str = "publish_year";

/// How the cell content is turned into a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ValueKind {
    String,
    Integer,
    DateTime,
    Year,
}

/// What to do when a cell has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// A missing value makes the whole record malformed.
    Required,
    /// A missing value is emitted as an empty string.
    Always,
    /// A missing value means the statement is left out.
    Optional,
}

/// One row of the mapping table:
/// column name -> predicate -> datatype.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub column: &'static str,
    pub predicate: NamedNodeRef<'static>,
    pub kind: ValueKind,
    pub presence: Presence,
}

pub const FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        column: COL_VIDEO_ID,
        predicate: flow::VIDEO_ID,
        kind: ValueKind::String,
        presence: Presence::Required,
    },
    FieldSpec {
        column: COL_TITLE,
        predicate: flow::TITLE,
        kind: ValueKind::String,
        presence: Presence::Always,
    },
    FieldSpec {
        column: COL_DESCRIPTION,
        predicate: flow::DESCRIPTION,
        kind: ValueKind::String,
        presence: Presence::Always,
    },
    FieldSpec {
        column: COL_DURATION_MS,
        predicate: flow::DURATION_MS,
        kind: ValueKind::Integer,
        presence: Presence::Optional,
    },
    FieldSpec {
        column: COL_PUBLISH_TIMESTAMP,
        predicate: flow::PUBLISH_TIMESTAMP,
        kind: ValueKind::DateTime,
        presence: Presence::Optional,
    },
    FieldSpec {
        column: COL_PUBLISH_YEAR,
        predicate: flow::PUBLISH_YEAR,
        kind: ValueKind::Year,
        presence: Presence::Optional,
    },
];

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Row {row}: missing required value in column '{column}'")]
    MissingValue { row: usize, column: &'static str },
    #[error("Row {row}: value '{value}' in column '{column}' is not a valid {kind}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        kind: ValueKind,
    },
    #[error("Row {row}: identifier '{id}' is already used by an earlier row of the same dataset")]
    DuplicateIdentifier { row: usize, id: String },
    #[error("Row {row}: failed to form an IRI: {source}")]
    InvalidIri {
        row: usize,
        #[source]
        source: IriParseError,
    },
}

impl MappingError {
    #[must_use]
    pub const fn row(&self) -> usize {
        match self {
            Self::MissingValue { row, .. }
            | Self::InvalidValue { row, .. }
            | Self::DuplicateIdentifier { row, .. }
            | Self::InvalidIri { row, .. } => *row,
        }
    }
}

impl ValueKind {
    #[must_use]
    pub const fn datatype(self) -> NamedNodeRef<'static> {
        match self {
            Self::String => xsd::STRING,
            Self::Integer => xsd::INTEGER,
            Self::DateTime => xsd::DATE_TIME,
            Self::Year => xsd::G_YEAR,
        }
    }

    /// Converts the (trimmed, non-null) cell content
    /// into the lexical form of this kinds datatype.
    /// Returns `None` if that is not possible.
    #[must_use]
    pub fn lexical(self, raw: &str) -> Option<Cow<'_, str>> {
        match self {
            Self::String => Some(Cow::Borrowed(raw)),
            Self::Integer => parse_integer(raw).map(|value| Cow::Owned(value.to_string())),
            Self::Year => parse_integer(raw)
                .and_then(|year| PublishYear::try_from(year).ok())
                .map(|year| Cow::Owned(year_lexical(year))),
            Self::DateTime => Some(normalize_timestamp(raw)),
        }
    }
}

/// The `xsd:gYear` lexical form: at least four digits, after the sign.
fn year_lexical(year: PublishYear) -> String {
    let sign = if year < 0 { "-" } else { "" };
    format!("{sign}{:04}", year.unsigned_abs())
}

/// Parses an integer,
/// also accepting float notation with a zero fraction (e.g. "5000.0"),
/// which is what data-frame tooling writes for integer columns with gaps.
#[allow(clippy::cast_possible_truncation)]
fn parse_integer(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.fract().abs() < f64::EPSILON)
            .filter(|value| value.abs() < 9.0e15)
            .map(|value| value as i64)
    })
}

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// Brings a timestamp into the `xsd:dateTime` lexical form.
/// Unknown formats are kept as they are.
fn normalize_timestamp(raw: &str) -> Cow<'_, str> {
    let rfc3339 = DateTime::parse_from_rfc3339(raw);
    if rfc3339.is_ok() && raw.as_bytes().get(10) == Some(&b'T') {
        return Cow::Borrowed(raw);
    }
    if let Ok(with_offset) = rfc3339 {
        return Cow::Owned(with_offset.to_rfc3339());
    }
    if let Ok(with_offset) = DateTime::parse_from_str(raw, OFFSET_TIMESTAMP_FORMAT) {
        return Cow::Owned(with_offset.to_rfc3339());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Cow::Owned(naive.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }
    tracing::warn!("Timestamp '{raw}' is in an unknown format; keeping it as it is.");
    Cow::Borrowed(raw)
}

/// Produces all statements about the entity described by `record`,
/// including its links to `dataset`.
///
/// # Errors
///
/// - the identifier is missing
/// - a value can not be converted to its column's datatype
pub fn map_record(
    record: &EntityRecord,
    iris: &ResourceIris,
    dataset: NamedNodeRef<'_>,
) -> Result<Vec<Triple>, MappingError> {
    let row = record.row();
    let id = record
        .value(COL_VIDEO_ID)
        .ok_or(MappingError::MissingValue {
            row,
            column: COL_VIDEO_ID,
        })?;
    let video = iris
        .video(id)
        .map_err(|source| MappingError::InvalidIri { row, source })?;

    let mut triples = vec![Triple::new(video.clone(), rdf::TYPE, flow::VIDEO)];
    for field in &FIELDS {
        let value = match (record.value(field.column), field.presence) {
            (Some(value), _) => value,
            (None, Presence::Required) => {
                return Err(MappingError::MissingValue {
                    row,
                    column: field.column,
                })
            }
            (None, Presence::Always) => "",
            (None, Presence::Optional) => continue,
        };
        let lexical = field
            .kind
            .lexical(value)
            .ok_or_else(|| MappingError::InvalidValue {
                row,
                column: field.column,
                value: value.to_owned(),
                kind: field.kind,
            })?;
        triples.push(Triple::new(
            video.clone(),
            field.predicate,
            Literal::new_typed_literal(lexical, field.kind.datatype()),
        ));
    }
    triples.push(Triple::new(
        video.clone(),
        flow::BELONGS_TO_DATASET,
        dataset.into_owned(),
    ));
    triples.push(Triple::new(video, prov::WAS_DERIVED_FROM, dataset.into_owned()));
    Ok(triples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph_index::YearRange;
    use oxrdf::{Graph, NamedNode};

    fn dataset() -> NamedNode {
        NamedNode::new_unchecked("http://flow.ai/dataset/batch_x")
    }

    fn predicates(triples: &[Triple]) -> Vec<&str> {
        let mut predicates: Vec<_> = triples.iter().map(|t| t.predicate.as_str()).collect();
        predicates.sort_unstable();
        predicates
    }

    fn full_record() -> EntityRecord {
        EntityRecord::new(
            1,
            [
                (COL_VIDEO_ID, "v1"),
                (COL_TITLE, "Title"),
                (COL_DESCRIPTION, "Description"),
                (COL_DURATION_MS, "5000.0"),
                (COL_PUBLISH_TIMESTAMP, "2020-05-01 12:00:00"),
                (COL_PUBLISH_YEAR, "2020"),
            ],
        )
    }

    #[test]
    fn complete_record_yields_nine_statements() {
        let dataset = dataset();
        let triples = map_record(&full_record(), &ResourceIris::default(), dataset.as_ref()).unwrap();

        let mut expected = vec![
            rdf::TYPE.as_str(),
            flow::VIDEO_ID.as_str(),
            flow::TITLE.as_str(),
            flow::DESCRIPTION.as_str(),
            flow::DURATION_MS.as_str(),
            flow::PUBLISH_TIMESTAMP.as_str(),
            flow::PUBLISH_YEAR.as_str(),
            flow::BELONGS_TO_DATASET.as_str(),
            prov::WAS_DERIVED_FROM.as_str(),
        ];
        expected.sort_unstable();
        assert_eq!(predicates(&triples), expected);
    }

    #[test]
    fn literals_carry_datatypes() {
        let dataset = dataset();
        let triples = map_record(&full_record(), &ResourceIris::default(), dataset.as_ref()).unwrap();
        let video = NamedNode::new_unchecked("http://flow.ai/video/v1");

        let expect = |predicate: NamedNodeRef<'_>, literal: Literal| {
            let triple = Triple::new(video.clone(), predicate, literal);
            assert!(triples.contains(&triple), "missing {triple}");
        };
        expect(flow::VIDEO_ID, Literal::new_typed_literal("v1", xsd::STRING));
        expect(flow::DURATION_MS, Literal::new_typed_literal("5000", xsd::INTEGER));
        expect(
            flow::PUBLISH_TIMESTAMP,
            Literal::new_typed_literal("2020-05-01T12:00:00", xsd::DATE_TIME),
        );
        expect(flow::PUBLISH_YEAR, Literal::new_typed_literal("2020", xsd::G_YEAR));
        assert!(triples.contains(&Triple::new(video.clone(), flow::BELONGS_TO_DATASET, dataset.clone())));
        assert!(triples.contains(&Triple::new(video, prov::WAS_DERIVED_FROM, dataset)));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let record = EntityRecord::new(
            2,
            [
                (COL_VIDEO_ID, "v2"),
                (COL_TITLE, "Title"),
                (COL_DESCRIPTION, "Description"),
                (COL_DURATION_MS, ""),
                (COL_PUBLISH_TIMESTAMP, "NaN"),
            ],
        );
        let dataset = dataset();
        let triples = map_record(&record, &ResourceIris::default(), dataset.as_ref()).unwrap();

        let mut expected = vec![
            rdf::TYPE.as_str(),
            flow::VIDEO_ID.as_str(),
            flow::TITLE.as_str(),
            flow::DESCRIPTION.as_str(),
            flow::BELONGS_TO_DATASET.as_str(),
            prov::WAS_DERIVED_FROM.as_str(),
        ];
        expected.sort_unstable();
        assert_eq!(predicates(&triples), expected);
    }

    #[test]
    fn blank_title_is_kept_as_empty_string() {
        let record = EntityRecord::new(1, [(COL_VIDEO_ID, "v1")]);
        let dataset = dataset();
        let triples = map_record(&record, &ResourceIris::default(), dataset.as_ref()).unwrap();

        assert!(triples.contains(&Triple::new(
            NamedNode::new_unchecked("http://flow.ai/video/v1"),
            flow::TITLE,
            Literal::new_typed_literal("", xsd::STRING),
        )));
    }

    #[test]
    fn missing_identifier_is_fatal() {
        let record = EntityRecord::new(7, [(COL_VIDEO_ID, " "), (COL_TITLE, "Title")]);
        let dataset = dataset();
        let err = map_record(&record, &ResourceIris::default(), dataset.as_ref()).unwrap_err();

        assert!(matches!(
            err,
            MappingError::MissingValue { row: 7, column: COL_VIDEO_ID }
        ));
    }

    #[test]
    fn non_numeric_duration_is_malformed() {
        let record = EntityRecord::new(3, [(COL_VIDEO_ID, "v3"), (COL_DURATION_MS, "long")]);
        let dataset = dataset();
        let err = map_record(&record, &ResourceIris::default(), dataset.as_ref()).unwrap_err();

        assert_eq!(err.row(), 3);
        assert_eq!(
            err.to_string(),
            "Row 3: value 'long' in column 'approx_duration_(ms)' is not a valid integer"
        );
    }

    #[test]
    fn timestamps_are_normalized() {
        assert_eq!(normalize_timestamp("2020-05-01 12:00:00"), "2020-05-01T12:00:00");
        assert_eq!(normalize_timestamp("2020-05-01 12:00:00.5"), "2020-05-01T12:00:00.500");
        assert_eq!(normalize_timestamp("2020-05-01T12:00:00Z"), "2020-05-01T12:00:00Z");
        assert_eq!(
            normalize_timestamp("2020-05-01 12:00:00+02:00"),
            "2020-05-01T12:00:00+02:00"
        );
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn years_are_padded_after_the_sign() {
        assert_eq!(ValueKind::Year.lexical("2020").as_deref(), Some("2020"));
        assert_eq!(ValueKind::Year.lexical("2020.0").as_deref(), Some("2020"));
        assert_eq!(ValueKind::Year.lexical("5").as_deref(), Some("0005"));
        assert_eq!(ValueKind::Year.lexical("-5").as_deref(), Some("-0005"));
        assert_eq!(ValueKind::Year.lexical("-12345").as_deref(), Some("-12345"));
    }

    #[test]
    fn years_beyond_the_indexed_range_are_malformed() {
        assert_eq!(ValueKind::Year.lexical("3000000000"), None);

        let record = EntityRecord::new(1, [(COL_VIDEO_ID, "v1"), (COL_PUBLISH_YEAR, "3000000000")]);
        let dataset = dataset();
        let err = map_record(&record, &ResourceIris::default(), dataset.as_ref()).unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidValue { column: COL_PUBLISH_YEAR, kind: ValueKind::Year, .. }
        ));
    }

    #[test]
    fn mapped_years_are_read_back_by_the_index() {
        let record = EntityRecord::new(1, [(COL_VIDEO_ID, "v1"), (COL_PUBLISH_YEAR, "-5")]);
        let dataset = dataset();
        let graph: Graph = map_record(&record, &ResourceIris::default(), dataset.as_ref())
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(YearRange::of_graph(&graph), YearRange(Some(-5), Some(-5)));
    }

    #[test]
    fn integers_accept_float_notation() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("42.0"), Some(42));
        assert_eq!(parse_integer("42.5"), None);
        assert_eq!(parse_integer("inf"), None);
    }
}
