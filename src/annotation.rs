//! Per-type mapping metadata and the lookups built on it.
//!
//! Every [`Record`] exposes a static table of [`FieldDescriptor`]s, one per
//! annotated field in declaration order. A descriptor index is the handle used to
//! read or write that field, so all lookups here are a single pass over the table.

use crate::value::{FieldValue, WireValue};

/// The role a field plays when a record is written as a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The point's time, in whole seconds since the epoch.
    Timestamp,
    /// An indexed string tag with the given output name.
    Tag(&'static str),
    /// A typed data field with the given output name.
    Field(&'static str),
}

/// Mapping metadata for one annotated record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// Column name the field is decoded from, if any.
    pub column: Option<&'static str>,
    /// Role the field plays when encoded, if any.
    pub role: Option<Role>,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field with neither a column nor a role.
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            column: None,
            role: None,
        }
    }

    /// Binds the field to a column.
    #[must_use]
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column = Some(name);
        self
    }

    /// Gives the field an encode role.
    #[must_use]
    pub const fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// A record type that can be decoded from query rows and encoded into points.
///
/// Normally implemented with `#[derive(Record)]`. A manual implementation must
/// keep `assign` and `value` consistent with `FIELDS`: index `i` in both methods
/// refers to `FIELDS[i]`.
///
/// ```rust
/// use pointmap::{FieldDescriptor, FieldValue, Record, Role, ToFieldValue, WireValue};
///
/// #[derive(Default)]
/// struct Reading {
///     code: String,
///     value: f64,
/// }
///
/// impl Record for Reading {
///     const FIELDS: &'static [FieldDescriptor] = &[
///         FieldDescriptor::new("code").column("Code").role(Role::Tag("code")),
///         FieldDescriptor::new("value").column("Value").role(Role::Field("value")),
///     ];
///
///     fn assign(&mut self, index: usize, value: &WireValue) -> bool {
///         match index {
///             0 => pointmap::coerce::assign(&mut self.code, value),
///             1 => pointmap::coerce::assign(&mut self.value, value),
///             _ => false,
///         }
///     }
///
///     fn value(&self, index: usize) -> Option<FieldValue> {
///         match index {
///             0 => self.code.to_field_value(),
///             1 => self.value.to_field_value(),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(pointmap::annotation::column_index::<Reading>("Value"), Some(1));
/// ```
pub trait Record: Default {
    /// Annotated fields in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// Coerces `value` into the field at `index`.
    ///
    /// Returns true if the field was written. Unknown indices and fields without a
    /// column are never written.
    fn assign(&mut self, index: usize, value: &WireValue) -> bool;

    /// Reads the field at `index` as a point value.
    ///
    /// Returns `None` for absent optionals, unknown indices and fields without a role.
    fn value(&self, index: usize) -> Option<FieldValue>;
}

/// Returns the index of the first field bound to `column`.
pub fn column_index<R: Record>(column: &str) -> Option<usize> {
    R::FIELDS
        .iter()
        .position(|descriptor| descriptor.column == Some(column))
}

/// Returns the index of the timestamp field, if the record has one.
pub fn timestamp_index<R: Record>() -> Option<usize> {
    R::FIELDS
        .iter()
        .position(|descriptor| descriptor.role == Some(Role::Timestamp))
}

/// Iterates over `(index, output name)` of every tag field.
pub fn tag_fields<R: Record>() -> impl Iterator<Item = (usize, &'static str)> {
    R::FIELDS
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| match descriptor.role {
            Some(Role::Tag(name)) => Some((index, name)),
            _ => None,
        })
}

/// Iterates over `(index, output name)` of every data field.
pub fn field_fields<R: Record>() -> impl Iterator<Item = (usize, &'static str)> {
    R::FIELDS
        .iter()
        .enumerate()
        .filter_map(|(index, descriptor)| match descriptor.role {
            Some(Role::Field(name)) => Some((index, name)),
            _ => None,
        })
}

/// Header positions resolved to record field indices.
///
/// Built once per header so that data rows only index into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    targets: Vec<Option<usize>>,
}

impl ColumnMap {
    /// Resolves every header cell against the columns of `R`.
    ///
    /// A header cell's name is its display text.
    pub fn for_header<R: Record>(header: &[WireValue]) -> Self {
        let targets = header
            .iter()
            .map(|cell| column_index::<R>(&cell.to_string()))
            .collect();
        Self { targets }
    }

    /// Returns the field index for the cell at `position`.
    ///
    /// Positions past the end of the header and unknown columns resolve to `None`.
    pub fn target(&self, position: usize) -> Option<usize> {
        self.targets.get(position).copied().flatten()
    }

    /// Number of header cells.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if the header was empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
