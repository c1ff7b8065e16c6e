//! Guarded setters for building tag and field maps by hand.
//!
//! Each helper inserts only when its value is present: `None` is absent, an empty
//! tag string is absent, and for [`assign_if_present_and_typed`] a value whose type
//! does not match the map is absent too.

use std::collections::BTreeMap;

use crate::coerce::ToFieldValue;
use crate::encode::{Fields, Tags};
use crate::value::FieldValue;

/// Inserts `value` under `key` if it is present, not an empty string, and of the
/// map's value type.
///
/// ```rust
/// use pointmap::assign::assign_if_present_and_typed;
/// use pointmap::{FieldValue, Fields, Tags};
///
/// let mut tags = Tags::new();
/// let mut fields = Fields::new();
/// assign_if_present_and_typed("tag1", Some("1"), &mut tags);
/// assign_if_present_and_typed("tag3", Some(""), &mut tags);
/// assign_if_present_and_typed("field1", Some(&99.99), &mut fields);
/// assign_if_present_and_typed("field2", Some(&100), &mut fields);
/// assign_if_present_and_typed::<f64, _>("field3", None, &mut fields);
///
/// assert_eq!(tags.len(), 1);
/// assert_eq!(fields["field1"], FieldValue::Float(99.99));
/// assert_eq!(fields.len(), 2);
/// ```
pub fn assign_if_present_and_typed<V, M>(
    key: &str,
    value: Option<&V>,
    mapping: &mut BTreeMap<String, M>,
) where
    V: ToFieldValue + ?Sized,
    M: TryFrom<FieldValue>,
{
    let Some(value) = value.and_then(|value| value.to_field_value()) else {
        return;
    };
    if matches!(&value, FieldValue::String(text) if text.is_empty()) {
        return;
    }
    if let Ok(converted) = M::try_from(value) {
        mapping.insert(key.to_string(), converted);
    }
}

/// Inserts `value` under `key` if it is present.
pub fn assign_field<T>(key: &str, value: Option<&T>, fields: &mut Fields)
where
    T: ToFieldValue + ?Sized,
{
    if let Some(value) = value.and_then(|value| value.to_field_value()) {
        fields.insert(key.to_string(), value);
    }
}

/// Inserts `value` under `key` if it is not empty.
pub fn assign_tag(key: &str, value: &str, tags: &mut Tags) {
    if !value.is_empty() {
        tags.insert(key.to_string(), value.to_string());
    }
}

/// Calls `on_present` with the value if there is one.
pub fn assign_if_present<T, F>(value: Option<T>, on_present: F)
where
    F: FnOnce(T),
{
    if let Some(value) = value {
        on_present(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_assignment_into_field_map() {
        let mut fields = Fields::new();
        assign_if_present_and_typed("k", Some(&99.99), &mut fields);
        assert_eq!(fields.get("k"), Some(&FieldValue::Float(99.99)));

        let before = fields.clone();
        assign_if_present_and_typed::<f64, _>("other", None, &mut fields);
        assert_eq!(fields, before);
    }

    #[test]
    fn test_typed_assignment_filters_by_type() {
        let mut floats: BTreeMap<String, f64> = BTreeMap::new();
        assign_if_present_and_typed("a", Some(&1.5), &mut floats);
        assign_if_present_and_typed("b", Some(&7i64), &mut floats);
        assign_if_present_and_typed("c", Some("text"), &mut floats);
        assert_eq!(floats.len(), 1);
        assert_eq!(floats["a"], 1.5);

        let mut tags = Tags::new();
        assign_if_present_and_typed("tag1", Some("1"), &mut tags);
        assign_if_present_and_typed("tag2", Some(&String::from("C001")), &mut tags);
        assign_if_present_and_typed("tag3", Some(""), &mut tags);
        assign_if_present_and_typed("tag4", Some(&4.0), &mut tags);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["tag2"], "C001");
    }

    #[test]
    fn test_typed_assignment_dereferences_one_optional() {
        let mut fields = Fields::new();
        let present: Option<i32> = Some(100);
        let absent: Option<i32> = None;
        assign_if_present_and_typed("present", Some(&present), &mut fields);
        assign_if_present_and_typed("absent", Some(&absent), &mut fields);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["present"], FieldValue::Integer(100));
    }

    #[test]
    fn test_assign_field() {
        let mut fields = Fields::new();
        let field1 = Some(99.99);
        let field2 = Some(100);
        let field3: Option<i32> = None;
        assign_field("field1", field1.as_ref(), &mut fields);
        assign_field("field2", field2.as_ref(), &mut fields);
        assign_field("field3", field3.as_ref(), &mut fields);
        assign_field("empty", Some(""), &mut fields);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["empty"], FieldValue::String(String::new()));
    }

    #[test]
    fn test_assign_tag() {
        let mut tags = Tags::new();
        assign_tag("k", "", &mut tags);
        assert!(tags.is_empty());
        assign_tag("k", "v", &mut tags);
        assert_eq!(tags["k"], "v");
    }

    #[test]
    fn test_assign_if_present() {
        let mut seen = Vec::new();
        assign_if_present(Some(3), |value| seen.push(value));
        assign_if_present(None, |value: i32| seen.push(value));
        assert_eq!(seen, vec![3]);
    }
}
