use std::fmt::Write;

use super::{Point, Precision};
use crate::value::FieldValue;

/// Appends `point` to `out` as one line of line protocol, without a newline.
pub(crate) fn write_point(out: &mut String, point: &Point, precision: Precision) {
    escape_into(out, point.measurement(), &[',', ' ']);

    // empty tag values are not representable
    for (key, value) in point.tags().iter().filter(|(_, value)| !value.is_empty()) {
        out.push(',');
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        escape_into(out, value, &[',', '=', ' ']);
    }

    out.push(' ');
    for (position, (key, value)) in point.fields().iter().enumerate() {
        if position > 0 {
            out.push(',');
        }
        escape_into(out, key, &[',', '=', ' ']);
        out.push('=');
        write_field_value(out, value);
    }

    out.push(' ');
    let _ = write!(out, "{}", precision.timestamp(point.time()));
}

fn write_field_value(out: &mut String, value: &FieldValue) {
    let _ = match value {
        FieldValue::Float(v) => write!(out, "{v}"),
        FieldValue::Integer(v) => write!(out, "{v}i"),
        FieldValue::UnsignedInteger(v) => write!(out, "{v}u"),
        FieldValue::Boolean(v) => write!(out, "{v}"),
        FieldValue::String(v) => {
            out.push('"');
            escape_into(out, v, &['"', '\\']);
            out.push('"');
            Ok(())
        }
    };
}

fn escape_into(out: &mut String, text: &str, special: &[char]) {
    for c in text.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}
