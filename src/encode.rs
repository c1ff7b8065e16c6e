//! Encoding of typed records into point triples.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::annotation::{Record, Role};
use crate::error::MapError;
use crate::point::{BatchPoints, Point};
use crate::value::{FieldValue, timestamp_from_secs};

/// Tag set of a point, keyed by tag name.
pub type Tags = BTreeMap<String, String>;

/// Field set of a point, keyed by field name.
pub type Fields = BTreeMap<String, FieldValue>;

/// Everything needed to construct one point, minus the measurement name.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTriple {
    /// Point time. Records without a usable timestamp get the epoch.
    pub timestamp: DateTime<Utc>,
    /// String tags.
    pub tags: Tags,
    /// Typed fields.
    pub fields: Fields,
}

/// Builds the point triple of a single record.
///
/// - The timestamp field is read as whole seconds. A missing timestamp field, an
///   absent optional or a non-integer value leaves the epoch.
/// - Tag fields are included when they hold a string. Absent optionals are skipped;
///   empty strings are kept.
/// - Data fields are included when present.
pub fn to_triple<R: Record>(record: &R) -> PointTriple {
    let mut timestamp = DateTime::<Utc>::UNIX_EPOCH;
    let mut tags = Tags::new();
    let mut fields = Fields::new();

    for (index, descriptor) in R::FIELDS.iter().enumerate() {
        let Some(role) = descriptor.role else {
            continue;
        };
        let Some(value) = record.value(index) else {
            continue;
        };
        match (role, value) {
            (Role::Timestamp, FieldValue::Integer(seconds)) => {
                timestamp = timestamp_from_secs(seconds);
            }
            (Role::Timestamp, _) => {}
            (Role::Tag(name), FieldValue::String(tag)) => {
                tags.insert(name.to_string(), tag);
            }
            (Role::Tag(_), _) => {}
            (Role::Field(name), value) => {
                fields.insert(name.to_string(), value);
            }
        }
    }

    PointTriple {
        timestamp,
        tags,
        fields,
    }
}

/// Encodes every record and hands each triple to `on_emit`, in input order.
///
/// Returns [`MapError::EmptyInput`] without calling `on_emit` when `records` is
/// empty.
///
/// ```rust
/// use pointmap::{Record, encode};
///
/// #[derive(Default, Record)]
/// struct Reading {
///     #[record(timestamp)]
///     time: i64,
///     #[record(tag = "code")]
///     code: String,
///     #[record(field = "value")]
///     value: Option<f64>,
/// }
///
/// let readings = vec![Reading { time: 60, code: "C01".into(), value: Some(9.9) }];
/// encode(&readings, |timestamp, tags, fields| {
///     assert_eq!(timestamp.timestamp(), 60);
///     assert_eq!(tags["code"], "C01");
///     assert_eq!(fields["value"].as_float(), Some(9.9));
/// })?;
/// # Ok::<(), pointmap::MapError>(())
/// ```
pub fn encode<R, F>(records: &[R], mut on_emit: F) -> Result<(), MapError>
where
    R: Record,
    F: FnMut(DateTime<Utc>, Tags, Fields),
{
    if records.is_empty() {
        return Err(MapError::EmptyInput);
    }
    for record in records {
        let PointTriple {
            timestamp,
            tags,
            fields,
        } = to_triple(record);
        on_emit(timestamp, tags, fields);
    }
    Ok(())
}

/// Encodes every record as a point of `measurement` and adds it to `batch`.
///
/// Records whose point cannot be built (for example a record with no present
/// fields) are skipped.
pub fn encode_batch<R: Record>(
    records: &[R],
    measurement: &str,
    batch: &mut BatchPoints,
) -> Result<(), MapError> {
    encode(records, |timestamp, tags, fields| {
        match Point::new(measurement, tags, fields, timestamp) {
            Ok(point) => batch.add_point(point),
            Err(err) => {
                #[cfg(feature = "logging")]
                log::warn!("skipping point for measurement '{measurement}': {err}");
                #[cfg(not(feature = "logging"))]
                let _ = err;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[derive(Debug, Default, Clone, Record)]
    struct Reading {
        #[record(timestamp)]
        timestamp: i64,
        #[record(tag = "id")]
        id: String,
        #[record(tag = "site")]
        site: Option<String>,
        #[record(field = "field1")]
        field1: Option<f64>,
        #[record(field = "field2")]
        field2: Option<i32>,
        #[record(field = "field3")]
        field3: Option<i32>,
    }

    fn reading(id: &str, field1: f64, field2: i32) -> Reading {
        Reading {
            timestamp: 1_700_000_000,
            id: id.to_string(),
            site: None,
            field1: Some(field1),
            field2: Some(field2),
            field3: None,
        }
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let mut calls = 0;
        let result = encode::<Reading, _>(&[], |_, _, _| calls += 1);
        assert_eq!(result, Err(MapError::EmptyInput));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_triples_in_order() {
        let records = vec![reading("1", 9.9, 10), reading("2", 11.9, 22)];
        let mut emitted = Vec::new();
        encode(&records, |timestamp, tags, fields| {
            emitted.push((timestamp, tags, fields));
        })
        .unwrap();

        assert_eq!(emitted.len(), 2);
        let (timestamp, tags, fields) = &emitted[0];
        assert_eq!(timestamp.timestamp(), 1_700_000_000);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["id"], "1");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["field1"], FieldValue::Float(9.9));
        assert_eq!(fields["field2"], FieldValue::Integer(10));
        assert!(!fields.contains_key("field3"));

        assert_eq!(emitted[1].1["id"], "2");
    }

    #[test]
    fn test_optional_tag_and_empty_tag() {
        let mut record = reading("", 1.0, 1);
        record.site = Some("north".to_string());
        let triple = to_triple(&record);
        assert_eq!(triple.tags.get("id").map(String::as_str), Some(""));
        assert_eq!(triple.tags.get("site").map(String::as_str), Some("north"));
    }

    #[test]
    fn test_missing_timestamp_defaults_to_epoch() {
        #[derive(Default, Record)]
        struct Untimed {
            #[record(timestamp)]
            at: Option<i64>,
            #[record(field = "v")]
            v: f64,
        }

        let triple = to_triple(&Untimed { at: None, v: 1.0 });
        assert_eq!(triple.timestamp, DateTime::<Utc>::UNIX_EPOCH);

        let triple = to_triple(&Untimed { at: Some(5), v: 1.0 });
        assert_eq!(triple.timestamp.timestamp(), 5);
    }

    #[test]
    fn test_non_string_tags_are_dropped() {
        #[derive(Default, Record)]
        struct Numbered {
            #[record(tag = "n")]
            n: i32,
        }

        let triple = to_triple(&Numbered { n: 4 });
        assert!(triple.tags.is_empty());
        assert!(triple.fields.is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = vec![reading("1", 9.9, 10)];
        let before = format!("{records:?}");
        encode(&records, |_, _, _| {}).unwrap();
        assert_eq!(format!("{records:?}"), before);
    }

    #[test]
    fn test_encode_batch_skips_pointless_records() {
        let mut empty = reading("3", 0.0, 0);
        empty.field1 = None;
        empty.field2 = None;
        let records = vec![reading("1", 9.9, 10), empty, reading("2", 11.9, 22)];

        let mut batch = BatchPoints::builder().database("my-database").build();
        encode_batch(&records, "my_name", &mut batch).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.points()[1].tags()["id"], "2");
    }
}
