//! Decoding of tabular query results into typed records.

use crate::annotation::{ColumnMap, Record};
use crate::response::Series;
use crate::value::WireValue;

/// Decodes a header row followed by data rows into one record per data row.
///
/// Cells are matched to fields through the header: the cell at position `j` goes
/// to the first field whose column alias equals the name of header cell `j`.
/// Cells without a matching field, cells past the end of the header and cells that
/// fail to coerce are skipped, leaving the field at its default. An empty input or
/// a header with no data rows yields an empty vector.
///
/// ```rust
/// use pointmap::{Record, WireValue, decode};
///
/// #[derive(Debug, Default, Record)]
/// struct Reading {
///     #[record(column = "code")]
///     code: String,
///     #[record(column = "value")]
///     value: f64,
/// }
///
/// let rows = vec![
///     vec![WireValue::from("code"), WireValue::from("value")],
///     vec![WireValue::from("C01"), WireValue::Number("9.9".to_string())],
/// ];
/// let readings: Vec<Reading> = decode(&rows);
/// assert_eq!(readings[0].code, "C01");
/// assert_eq!(readings[0].value, 9.9);
/// ```
pub fn decode<R, Row>(rows: &[Row]) -> Vec<R>
where
    R: Record,
    Row: AsRef<[WireValue]>,
{
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let columns = ColumnMap::for_header::<R>(header.as_ref());
    data.iter()
        .map(|row| decode_row(&columns, row.as_ref()))
        .collect()
}

/// Decodes the rows of a response series, using its column names as the header.
pub fn decode_series<R: Record>(series: &Series) -> Vec<R> {
    let columns = ColumnMap::for_header::<R>(&series.header());
    series
        .values
        .iter()
        .map(|row| decode_row(&columns, row))
        .collect()
}

/// Decodes a single data row against an already resolved header.
pub fn decode_row<R: Record>(columns: &ColumnMap, row: &[WireValue]) -> R {
    let mut record = R::default();
    for (position, cell) in row.iter().enumerate() {
        let Some(index) = columns.target(position) else {
            #[cfg(feature = "logging")]
            if position >= columns.len() {
                log::trace!(
                    "skipping cell {position}: row is longer than the {}-column header",
                    columns.len()
                );
            }
            continue;
        };
        let written = record.assign(index, cell);
        #[cfg(feature = "logging")]
        if !written && !cell.is_null() {
            log::trace!(
                "skipping cell {position}: '{cell}' does not fit field '{}'",
                R::FIELDS[index].ident
            );
        }
        #[cfg(not(feature = "logging"))]
        let _ = written;
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[derive(Debug, Default, PartialEq, Record)]
    struct Sample {
        #[record(column = "time")]
        time: i64,
        #[record(column = "value")]
        value: f64,
        #[record(column = "code")]
        code: String,
        #[record(column = "count")]
        count: Option<u32>,
    }

    fn number(text: &str) -> WireValue {
        WireValue::Number(text.to_string())
    }

    fn header() -> Vec<WireValue> {
        ["time", "value", "code", "count"]
            .into_iter()
            .map(WireValue::from)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Vec<WireValue>> = Vec::new();
        assert!(decode::<Sample, _>(&rows).is_empty());

        let rows = vec![header()];
        assert!(decode::<Sample, _>(&rows).is_empty());
    }

    #[test]
    fn test_rows_in_order() {
        let rows = vec![
            header(),
            vec![number("1"), number("1.5"), WireValue::from("A"), number("3")],
            vec![number("2"), number("2.5"), WireValue::from("B"), WireValue::Null],
        ];
        let decoded: Vec<Sample> = decode(&rows);
        assert_eq!(
            decoded,
            vec![
                Sample {
                    time: 1,
                    value: 1.5,
                    code: "A".to_string(),
                    count: Some(3),
                },
                Sample {
                    time: 2,
                    value: 2.5,
                    code: "B".to_string(),
                    count: None,
                },
            ]
        );
    }

    #[test]
    fn test_unparseable_cells_keep_defaults() {
        let rows = vec![
            header(),
            vec![number("1.7"), WireValue::from("warm"), number("42"), number("-1")],
        ];
        let decoded: Vec<Sample> = decode(&rows);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].time, 0);
        assert_eq!(decoded[0].value, 0.0);
        assert_eq!(decoded[0].code, "42");
        assert_eq!(decoded[0].count, None);
    }

    #[test]
    fn test_mismatched_lengths_are_tolerated() {
        let rows = vec![
            vec![WireValue::from("value"), WireValue::from("code")],
            vec![number("1.5")],
            vec![number("2.5"), WireValue::from("B"), WireValue::from("extra")],
        ];
        let decoded: Vec<Sample> = decode(&rows);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].value, 1.5);
        assert_eq!(decoded[0].code, "");
        assert_eq!(decoded[1].code, "B");
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let rows = vec![
            vec![WireValue::from("humidity"), WireValue::from("value")],
            vec![number("80"), number("3.25")],
        ];
        let decoded: Vec<Sample> = decode(&rows);
        assert_eq!(decoded[0].value, 3.25);
        assert_eq!(decoded[0].time, 0);
    }

    #[test]
    fn test_decode_series() {
        let series = Series {
            name: "sample".to_string(),
            columns: vec!["code".to_string(), "value".to_string()],
            values: vec![
                vec![WireValue::from("A"), number("0.5")],
                vec![WireValue::from("B"), WireValue::Null],
            ],
            ..Series::default()
        };
        let decoded: Vec<Sample> = decode_series(&series);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].code, "A");
        assert_eq!(decoded[0].value, 0.5);
        assert_eq!(decoded[1].value, 0.0);
    }

    #[test]
    fn test_unannotated_record_yields_defaults() {
        #[derive(Debug, Default, PartialEq, Record)]
        struct Plain {
            value: f64,
        }

        let rows = vec![
            vec![WireValue::from("value")],
            vec![number("1")],
            vec![number("2")],
        ];
        let decoded: Vec<Plain> = decode(&rows);
        assert_eq!(decoded, vec![Plain::default(), Plain::default()]);
    }
}
