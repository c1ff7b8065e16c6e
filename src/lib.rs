//! # pointmap
//!
//! Annotation-driven mapping between time-series query results and typed records,
//! and between typed records and the points written back.
//!
//! ## Features
//!
//! - **Row decoding**: a header row plus data rows become one typed record per row
//! - **Point encoding**: records become (timestamp, tags, fields) triples
//! - **Lossless numbers**: numeric cells keep their decimal text until the target
//!   field's type is known
//! - **Best-effort policy**: unknown columns, short rows and unparseable cells are
//!   skipped, never reported
//! - **Guarded setters**: build tag and field maps by hand without empty entries
//!
//! ## Quick Start
//!
//! ```rust
//! use pointmap::{BatchPoints, Precision, Record, WireValue, decode, encode_batch};
//!
//! #[derive(Debug, Default, Record)]
//! struct Sensor {
//!     #[record(column = "time", timestamp)]
//!     time: i64,
//!     #[record(column = "code", tag = "code")]
//!     code: String,
//!     #[record(column = "temperature", field = "temperature")]
//!     temperature: f64,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = vec![
//!     vec![WireValue::from("time"), WireValue::from("code"), WireValue::from("temperature")],
//!     vec![
//!         WireValue::Number("1700000000".to_string()),
//!         WireValue::from("C01"),
//!         WireValue::Number("21.5".to_string()),
//!     ],
//! ];
//! let sensors: Vec<Sensor> = decode(&rows);
//!
//! let mut batch = BatchPoints::builder().precision(Precision::Seconds).build();
//! encode_batch(&sensors, "sensor", &mut batch)?;
//! assert_eq!(batch.to_line_protocol(), "sensor,code=C01 temperature=21.5 1700000000");
//! # Ok(())
//! # }
//! ```
//!
//! ## Cargo features
//!
//! - `derive` (default): `#[derive(Record)]`
//! - `logging`: trace messages for skipped cells and warnings for skipped points,
//!   through the `log` facade

#![deny(missing_docs)]

extern crate self as pointmap;

pub mod annotation;
pub mod assign;
pub mod coerce;
pub mod decode;
pub mod encode;
mod error;
pub mod point;
pub mod query;
pub mod response;
pub mod value;

pub use annotation::{FieldDescriptor, Record, Role};
pub use coerce::{FromWire, ToFieldValue, coerce, round_to_precision};
pub use decode::{decode, decode_series};
pub use encode::{Fields, PointTriple, Tags, encode, encode_batch, to_triple};
pub use error::{MapError, PointError};
pub use point::{BatchPoints, BatchPointsBuilder, Point, Precision};
pub use response::{QueryResponse, QueryResult, Series, try_parse};
pub use value::{FieldValue, ValueKind, WireValue, format_timestamp};

#[cfg(feature = "derive")]
pub use pointmap_derive::Record;
