//! Typed model of a JSON query response.
//!
//! The shape follows what a time-series HTTP query endpoint returns: one result per
//! statement, each holding zero or more series of positional rows. Cells are kept
//! as [`WireValue`]s so that numbers retain their literal text.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::value::WireValue;

/// A full query response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryResponse {
    /// One result per statement.
    pub results: Vec<QueryResult>,
    /// Error affecting the whole request.
    pub error: Option<String>,
}

/// The result of one statement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryResult {
    /// Position of the statement in the request.
    pub statement_id: Option<u64>,
    /// Series produced by the statement.
    pub series: Vec<Series>,
    /// Error reported for this statement.
    pub error: Option<String>,
}

/// A named block of rows sharing one set of columns.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Series {
    /// Measurement name.
    pub name: String,
    /// Group-by tags of the series.
    pub tags: BTreeMap<String, String>,
    /// Column names, positionally aligned with every row.
    pub columns: Vec<String>,
    /// Data rows.
    pub values: Vec<Vec<WireValue>>,
    /// Set when the server truncated the series.
    pub partial: bool,
}

impl QueryResponse {
    /// Parses a JSON response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// Iterates over every series of every result, in order.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.results.iter().flat_map(|result| result.series.iter())
    }
}

impl Series {
    /// Returns the column names as a header row.
    pub fn header(&self) -> Vec<WireValue> {
        self.columns
            .iter()
            .map(|column| WireValue::String(column.clone()))
            .collect()
    }

    /// Returns a tabular result made of `header` followed by the series rows.
    ///
    /// Useful when the record's column aliases differ from the column names the
    /// query produced.
    pub fn rows_with_header<S: AsRef<str>>(&self, header: &[S]) -> Vec<Vec<WireValue>> {
        let header = header
            .iter()
            .map(|name| WireValue::String(name.as_ref().to_string()))
            .collect();
        std::iter::once(header)
            .chain(self.values.iter().cloned())
            .collect()
    }
}

/// Maps every row of every series of every result through `on_row`, in order.
pub fn try_parse<T, F>(results: &[QueryResult], mut on_row: F) -> Vec<T>
where
    F: FnMut(&[WireValue]) -> T,
{
    results
        .iter()
        .flat_map(|result| result.series.iter())
        .flat_map(|series| series.values.iter())
        .map(|row| on_row(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "results": [
            {
                "statement_id": 0,
                "series": [
                    {
                        "name": "sensor",
                        "tags": {"code": "A"},
                        "columns": ["time", "temperature"],
                        "values": [[1700000000, 21.50], [1700000900, null]]
                    },
                    {
                        "name": "sensor",
                        "tags": {"code": "B"},
                        "columns": ["time", "temperature"],
                        "values": [[1700000000, 19]]
                    }
                ]
            },
            {"statement_id": 1, "error": "measurement not found"}
        ]
    }"#;

    #[test]
    fn test_parse_response() {
        let response = QueryResponse::from_json(BODY).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].error.as_deref(), Some("measurement not found"));
        assert!(response.results[1].series.is_empty());

        let first = &response.results[0].series[0];
        assert_eq!(first.tags["code"], "A");
        assert_eq!(first.values[0][0], WireValue::Number("1700000000".to_string()));
        assert_eq!(first.values[0][1], WireValue::Number("21.50".to_string()));
        assert_eq!(first.values[1][1], WireValue::Null);
        assert_eq!(response.series().count(), 2);
    }

    #[test]
    fn test_try_parse_visits_all_rows() {
        let response = QueryResponse::from_json(BODY).unwrap();
        let temperatures = try_parse(&response.results, |row| row[1].as_f64());
        assert_eq!(temperatures, vec![21.5, 0.0, 19.0]);
    }

    #[test]
    fn test_rows_with_header() {
        let response = QueryResponse::from_json(BODY).unwrap();
        let rows = response.results[0].series[0].rows_with_header(&["Timestamp", "Temperature"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec![WireValue::from("Timestamp"), WireValue::from("Temperature")]);
        assert_eq!(rows[1][1], WireValue::Number("21.50".to_string()));
    }

    #[test]
    fn test_number_literals_are_kept_verbatim() {
        let body = r#"{"results": [{"series": [{
            "columns": ["a", "b", "c"],
            "values": [[21.50, 123456789012345678901234, 0.1000000000000000055511]]
        }]}]}"#;
        let response = QueryResponse::from_json(body).unwrap();
        let row = &response.results[0].series[0].values[0];
        assert_eq!(
            row,
            &vec![
                WireValue::Number("21.50".to_string()),
                WireValue::Number("123456789012345678901234".to_string()),
                WireValue::Number("0.1000000000000000055511".to_string()),
            ]
        );
    }
}
