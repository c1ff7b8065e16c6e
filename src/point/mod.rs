//! Points ready to be written, and batches of them.
//!
//! A [`Point`] is a validated point triple plus its measurement name. Points are
//! collected into a [`BatchPoints`], which renders them as line protocol for an
//! external writer.

pub(crate) mod batch;
pub(crate) mod line_protocol;

use chrono::{DateTime, Utc};

use crate::encode::{Fields, Tags};
use crate::error::PointError;
use crate::value::FieldValue;

pub use batch::{BatchPoints, BatchPointsBuilder, Precision};

/// A single data point.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Tags,
    fields: Fields,
    time: DateTime<Utc>,
}

impl Point {
    /// Creates a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the measurement is empty, there are no fields, or a float
    /// field is NaN or infinite.
    pub fn new(
        measurement: impl Into<String>,
        tags: Tags,
        fields: Fields,
        time: DateTime<Utc>,
    ) -> Result<Self, PointError> {
        let measurement = measurement.into();
        if measurement.is_empty() {
            return Err(PointError::MissingMeasurement);
        }
        if fields.is_empty() {
            return Err(PointError::NoFields);
        }
        if let Some((key, _)) = fields
            .iter()
            .find(|(_, value)| matches!(value, FieldValue::Float(v) if !v.is_finite()))
        {
            return Err(PointError::NonFiniteField(key.clone()));
        }
        Ok(Self {
            measurement,
            tags,
            fields,
            time,
        })
    }

    /// Returns the measurement name.
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    /// Returns the tag set.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Returns the field set.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns the point time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Renders the point as one line of line protocol, with the timestamp in the
    /// given precision.
    pub fn to_line_protocol(&self, precision: Precision) -> String {
        let mut line = String::new();
        line_protocol::write_point(&mut line, self, precision);
        line
    }
}
