//! Coercion between wire values and record field types.
//!
//! Decoding goes through [`coerce`], which turns a [`WireValue`] into a
//! [`FieldValue`] of the requested [`ValueKind`], and [`FromWire`], which narrows
//! that value into the concrete field type. Every failure is soft: the caller gets
//! `None` and the field keeps whatever it held before.
//!
//! Encoding goes through [`ToFieldValue`], which reads a field as a point value and
//! yields nothing for an absent optional.

use chrono::{DateTime, Utc};

use crate::value::{FieldValue, ValueKind, WireValue};

/// Converts a wire value into a value of the given kind.
///
/// - `Null` never converts.
/// - Numeric text parses as a base-10 integer, a decimal float, or is taken
///   verbatim for string targets. Fractional text does not convert to integers.
/// - Plain strings only convert to string targets.
/// - Native scalars convert when the kinds agree. Integers also widen to floats and
///   cross between signed and unsigned when the value fits.
pub fn coerce(value: &WireValue, kind: ValueKind) -> Option<FieldValue> {
    match value {
        WireValue::Null => None,
        WireValue::Number(text) => parse_number(text, kind),
        WireValue::String(text) => match kind {
            ValueKind::String => Some(FieldValue::String(text.clone())),
            _ => None,
        },
        WireValue::Scalar(scalar) => convert_scalar(scalar, kind),
    }
}

fn parse_number(text: &str, kind: ValueKind) -> Option<FieldValue> {
    match kind {
        ValueKind::Integer => text.parse().ok().map(FieldValue::Integer),
        ValueKind::UnsignedInteger => text.parse().ok().map(FieldValue::UnsignedInteger),
        ValueKind::Float => text.parse().ok().map(FieldValue::Float),
        ValueKind::String => Some(FieldValue::String(text.to_string())),
        ValueKind::Boolean => None,
    }
}

fn convert_scalar(scalar: &FieldValue, kind: ValueKind) -> Option<FieldValue> {
    match (scalar, kind) {
        (FieldValue::Float(v), ValueKind::Float) => Some(FieldValue::Float(*v)),
        (FieldValue::Integer(v), ValueKind::Integer) => Some(FieldValue::Integer(*v)),
        (FieldValue::Integer(v), ValueKind::UnsignedInteger) => {
            u64::try_from(*v).ok().map(FieldValue::UnsignedInteger)
        }
        (FieldValue::Integer(v), ValueKind::Float) => Some(FieldValue::Float(*v as f64)),
        (FieldValue::UnsignedInteger(v), ValueKind::UnsignedInteger) => {
            Some(FieldValue::UnsignedInteger(*v))
        }
        (FieldValue::UnsignedInteger(v), ValueKind::Integer) => {
            i64::try_from(*v).ok().map(FieldValue::Integer)
        }
        (FieldValue::UnsignedInteger(v), ValueKind::Float) => Some(FieldValue::Float(*v as f64)),
        (FieldValue::String(v), ValueKind::String) => Some(FieldValue::String(v.clone())),
        (FieldValue::Boolean(v), ValueKind::Boolean) => Some(FieldValue::Boolean(*v)),
        _ => None,
    }
}

/// Rounds `value` to `precision` decimal places, half away from zero.
///
/// A precision of zero or less returns the value unchanged. Rounding is done on
/// the shortest decimal text that reads back as `value`, so inputs round the way
/// they print: `1.005` rounds to `1.01` and `12345678901.234999` to
/// `12345678901.23`. Results are exact to within 1e-9 relative error.
pub fn round_to_precision(value: f64, precision: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Ok(places) = usize::try_from(precision) else {
        return value;
    };
    if places == 0 {
        return value;
    }

    // f64 Display never switches to exponent notation
    let text = value.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    if fraction.len() <= places {
        return value;
    }

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().take(places))
        .collect();
    if fraction.as_bytes()[places] >= b'5' {
        round_up(&mut digits);
    }

    let split = digits.len() - places;
    let mut rounded = String::with_capacity(digits.len() + 1);
    rounded.extend(digits[..split].iter().map(|&d| char::from(d)));
    rounded.push('.');
    rounded.extend(digits[split..].iter().map(|&d| char::from(d)));

    rounded
        .parse::<f64>()
        .map(|magnitude| magnitude.copysign(value))
        .unwrap_or(value)
}

/// Adds one unit in the last place to a run of ASCII digits.
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// A record field type that can be populated from a wire value.
pub trait FromWire: Sized {
    /// The kind of value [`coerce`] should produce for this type.
    const KIND: ValueKind;

    /// Narrows a coerced value into this type.
    ///
    /// Returns `None` when the value does not fit, e.g. an integer out of range.
    fn from_field_value(value: FieldValue) -> Option<Self>;
}

macro_rules! impl_from_wire_signed {
    ($($ty:ty),*) => {
        $(
            impl FromWire for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn from_field_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::Integer(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! impl_from_wire_unsigned {
    ($($ty:ty),*) => {
        $(
            impl FromWire for $ty {
                const KIND: ValueKind = ValueKind::UnsignedInteger;

                fn from_field_value(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::UnsignedInteger(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_wire_signed!(i8, i16, i32, i64, isize);
impl_from_wire_unsigned!(u8, u16, u32, u64, usize);

impl FromWire for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromWire for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_float().map(|v| v as f32)
    }
}

impl FromWire for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl FromWire for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value.as_boolean()
    }
}

/// Whole seconds since the Unix epoch.
impl FromWire for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Integer;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        value
            .as_integer()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
    }
}

impl<T: FromWire> FromWire for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        T::from_field_value(value).map(Some)
    }
}

/// Coerces `value` into `slot`, leaving `slot` untouched on failure.
///
/// Returns true if the slot was written.
pub fn assign<T: FromWire>(slot: &mut T, value: &WireValue) -> bool {
    match coerce(value, T::KIND).and_then(T::from_field_value) {
        Some(converted) => {
            *slot = converted;
            true
        }
        None => false,
    }
}

/// A record field type that can be written into a point.
pub trait ToFieldValue {
    /// Reads the field as a point value. Absent optionals yield `None`.
    fn to_field_value(&self) -> Option<FieldValue>;
}

macro_rules! impl_to_field_value {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl ToFieldValue for $ty {
                fn to_field_value(&self) -> Option<FieldValue> {
                    Some(FieldValue::$variant((*self).into()))
                }
            }
        )*
    };
}

impl_to_field_value!(Float: f32, f64);
impl_to_field_value!(Integer: i8, i16, i32, i64, u8, u16, u32);
impl_to_field_value!(UnsignedInteger: u64);
impl_to_field_value!(Boolean: bool);

impl ToFieldValue for isize {
    fn to_field_value(&self) -> Option<FieldValue> {
        i64::try_from(*self).ok().map(FieldValue::Integer)
    }
}

impl ToFieldValue for usize {
    fn to_field_value(&self) -> Option<FieldValue> {
        u64::try_from(*self).ok().map(FieldValue::UnsignedInteger)
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::String(self.to_string()))
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::String(self.clone()))
    }
}

/// Written as whole seconds since the Unix epoch.
impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Integer(self.timestamp()))
    }
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(self.clone())
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(ToFieldValue::to_field_value)
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> Option<FieldValue> {
        (**self).to_field_value()
    }
}
