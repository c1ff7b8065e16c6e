use chrono::{DateTime, Utc};

use super::Point;
use super::line_protocol;

/// Time unit used for the timestamps of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Nanoseconds
    #[default]
    Nanoseconds,
    /// Microseconds
    Microseconds,
    /// Milliseconds
    Milliseconds,
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
}

impl Precision {
    /// Returns the short name write endpoints expect, e.g. `"s"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Nanoseconds => "ns",
            Precision::Microseconds => "u",
            Precision::Milliseconds => "ms",
            Precision::Seconds => "s",
            Precision::Minutes => "m",
            Precision::Hours => "h",
        }
    }

    /// Parses a short name. `"n"` and `"ns"` are both nanoseconds, `"u"` and `"us"`
    /// both microseconds.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "n" | "ns" => Some(Precision::Nanoseconds),
            "u" | "us" => Some(Precision::Microseconds),
            "ms" => Some(Precision::Milliseconds),
            "s" => Some(Precision::Seconds),
            "m" => Some(Precision::Minutes),
            "h" => Some(Precision::Hours),
            _ => None,
        }
    }

    /// Expresses `time` as a whole number of this unit since the epoch.
    pub fn timestamp(&self, time: DateTime<Utc>) -> i64 {
        match self {
            Precision::Nanoseconds => time
                .timestamp_nanos_opt()
                .unwrap_or_else(|| time.timestamp().saturating_mul(1_000_000_000)),
            Precision::Microseconds => time.timestamp_micros(),
            Precision::Milliseconds => time.timestamp_millis(),
            Precision::Seconds => time.timestamp(),
            Precision::Minutes => time.timestamp().div_euclid(60),
            Precision::Hours => time.timestamp().div_euclid(3600),
        }
    }
}

/// Builder for a [`BatchPoints`].
///
/// # Example
///
/// ```rust
/// use pointmap::{BatchPoints, Precision};
///
/// let batch = BatchPoints::builder()
///     .database("my-database")
///     .precision(Precision::Seconds)
///     .build();
/// assert!(batch.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchPointsBuilder {
    database: String,
    retention_policy: Option<String>,
    precision: Precision,
}

impl BatchPointsBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target database.
    ///
    /// Default: empty, meaning the writer decides.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the retention policy points are written under.
    ///
    /// Default: none (the database default policy)
    #[must_use]
    pub fn retention_policy(mut self, policy: impl Into<String>) -> Self {
        self.retention_policy = Some(policy.into());
        self
    }

    /// Sets the timestamp precision used when rendering.
    ///
    /// Default: [`Precision::Nanoseconds`]
    #[must_use]
    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Creates the empty batch.
    pub fn build(self) -> BatchPoints {
        BatchPoints {
            database: self.database,
            retention_policy: self.retention_policy,
            precision: self.precision,
            points: Vec::new(),
        }
    }
}

/// Points collected for a single write.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPoints {
    database: String,
    retention_policy: Option<String>,
    precision: Precision,
    points: Vec<Point>,
}

impl BatchPoints {
    /// Returns a builder for configuring a batch.
    pub fn builder() -> BatchPointsBuilder {
        BatchPointsBuilder::new()
    }

    /// Appends a point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Returns the points in insertion order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points in the batch.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the batch holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the target database.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the retention policy, if one was set.
    pub fn retention_policy(&self) -> Option<&str> {
        self.retention_policy.as_deref()
    }

    /// Returns the timestamp precision.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Renders every point as line protocol, one point per line.
    pub fn to_line_protocol(&self) -> String {
        let mut out = String::new();
        for (position, point) in self.points.iter().enumerate() {
            if position > 0 {
                out.push('\n');
            }
            line_protocol::write_point(&mut out, point, self.precision);
        }
        out
    }
}
