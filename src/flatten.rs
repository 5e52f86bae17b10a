//! Flattening of nested maps into dotted-key pairs.

use serde::ser;

use crate::error::*;
use crate::value::{Kind, Map, Value};

/// Flattens a serializable value into `(dotted key, value)` pairs.
///
/// Nested structs and maps are walked depth-first in their own key order and
/// their keys joined with `.`. Arrays, scalars, dates and `Null` values are
/// leaves. `Undefined` values (`Option::None`) are dropped at any depth.
///
/// ```
/// # use serde::Serialize;
/// use serde_params::Value;
///
/// #[derive(Serialize)]
/// struct Address {
///     city: String,
///     street: Option<String>,
/// }
///
/// #[derive(Serialize)]
/// struct Query {
///     id: u32,
///     address: Address,
///     tags: Vec<&'static str>,
/// }
///
/// let query = Query {
///     id: 1,
///     address: Address { city: "Carrot City".into(), street: None },
///     tags: vec!["a", "b"],
/// };
/// let pairs = serde_params::flatten_object(&query).unwrap();
/// assert_eq!(pairs, vec![
///     ("id".to_string(), Value::from(1u32)),
///     ("address.city".to_string(), Value::from("Carrot City")),
///     ("tags".to_string(), Value::from(vec!["a", "b"])),
/// ]);
/// ```
pub fn flatten_object<T: ser::Serialize + ?Sized>(input: &T) -> Result<Vec<(String, Value)>> {
    crate::Config::default().flatten(input)
}

/// Flattens a map, prepending `prefix` as-is to every produced key.
///
/// This is the infallible core of [`flatten_object`].
pub fn flatten(map: Map, prefix: &str) -> Vec<(String, Value)> {
    Flattener::new(".").flatten(map, prefix)
}

/// Walks a [`Value`] tree, joining nested keys with `separator`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Flattener<'a> {
    separator: &'a str,
}

impl<'a> Flattener<'a> {
    pub(crate) fn new(separator: &'a str) -> Self {
        Self { separator }
    }

    /// Flattens a top-level value, which must be a map.
    pub(crate) fn flatten_value(self, value: Value) -> Result<Vec<(String, Value)>> {
        match value {
            Value::Map(map) => Ok(self.flatten(map, "")),
            other => Err(Error::top_level(describe(other.kind()))),
        }
    }

    pub(crate) fn flatten(self, map: Map, prefix: &str) -> Vec<(String, Value)> {
        let mut pairs = Vec::with_capacity(map.len());
        self.walk(map, prefix, &mut pairs);
        pairs
    }

    fn walk(self, map: Map, prefix: &str, pairs: &mut Vec<(String, Value)>) {
        for (key, value) in map {
            match value.kind() {
                Kind::Undefined => {}
                Kind::Record => {
                    let nested_prefix = [prefix, key.as_str(), self.separator].concat();
                    if let Value::Map(nested) = value {
                        self.walk(nested, &nested_prefix, pairs);
                    }
                }
                Kind::Null | Kind::Scalar | Kind::Date | Kind::Array => {
                    pairs.push(([prefix, key.as_str()].concat(), value));
                }
            }
        }
    }
}

fn describe(kind: Kind) -> &'static str {
    match kind {
        Kind::Undefined => "a missing value",
        Kind::Null => "a null value",
        Kind::Scalar => "a scalar",
        Kind::Date => "a date",
        Kind::Array => "a sequence",
        Kind::Record => "a map",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Map {
        entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
    }

    #[test]
    fn prefix_is_prepended_as_is() {
        let pairs = flatten(map([("a", 1.into()), ("b", map([("c", 2.into())]).into())]), "p_");
        assert_eq!(
            pairs,
            vec![
                ("p_a".to_string(), Value::from(1)),
                ("p_b.c".to_string(), Value::from(2)),
            ]
        );
    }

    #[test]
    fn undefined_records_leave_no_trace() {
        let pairs = flatten(
            map([
                ("a", 1.into()),
                ("b", map([("x", Value::Undefined), ("y", Value::Undefined)]).into()),
                ("c", Value::Null),
            ]),
            "",
        );
        assert_eq!(
            pairs,
            vec![("a".to_string(), Value::from(1)), ("c".to_string(), Value::Null)]
        );
    }

    #[test]
    fn arrays_are_leaves() {
        let nested = Value::from(vec![Value::from_iter([("x", 1)])]);
        let pairs = flatten(map([("a", nested.clone())]), "");
        assert_eq!(pairs, vec![("a".to_string(), nested)]);
    }

    #[test]
    fn custom_separator() {
        let pairs = Flattener::new("__").flatten(
            map([("a", map([("b", map([("c", true.into())]).into())]).into())]),
            "",
        );
        assert_eq!(pairs, vec![("a__b__c".to_string(), Value::from(true))]);
    }

    #[test]
    fn top_level_must_be_a_map() {
        let err = Flattener::new(".").flatten_value(Value::from(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot flatten a scalar at the top level, try flattening a struct or a map"
        );
    }
}
