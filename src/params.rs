//! An immutable, ordered collection of query parameters.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::ser;

use crate::codec::{Codec, ParamEncoder};
use crate::config::{ArrayFormat, Config};
use crate::error::{Error, Result};
use crate::value::Value;

/// Flattens a value and collects it into [`Params`].
///
/// Nested keys are joined with `.`, array elements repeat their key,
/// `Option::None` fields are left out and `()` values are written with an
/// empty value.
///
/// ```
/// use serde_json::json;
///
/// let params = serde_params::http_params(&json!({
///     "a": 1,
///     "b": { "x": 2 },
///     "c": ["1", 2],
///     "d": null,
/// })).unwrap();
/// assert_eq!(params.to_string(), "a=1&b.x=2&c=1&c=2&d=");
/// ```
pub fn http_params<T: ser::Serialize + ?Sized>(dto: &T) -> Result<Params> {
    Config::default().params(dto)
}

/// An immutable collection of query parameters.
///
/// Keys keep the order they were first inserted in and each key holds one or
/// more values. Operations which change the collection return a new one.
/// The codec `C` is used whenever the collection is written out with
/// `Display`.
///
/// ```
/// use serde_params::Params;
///
/// let params = Params::new().append("q", "rust serde").append("page", 2);
/// assert_eq!(params.to_string(), "q=rust%20serde&page=2");
///
/// let parsed: Params = params.to_string().parse().unwrap();
/// assert_eq!(parsed.get("q").unwrap(), "rust serde");
/// assert_eq!(parsed.get("page").unwrap(), "2");
/// ```
#[derive(Clone, Debug)]
pub struct Params<C = ParamEncoder> {
    entries: IndexMap<String, Vec<Value>>,
    codec: C,
}

impl Params {
    /// Creates an empty collection using the default [`ParamEncoder`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Default> Default for Params<C> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            codec: C::default(),
        }
    }
}

impl<C: Codec> Params<C> {
    /// Creates an empty collection which encodes with `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            entries: IndexMap::new(),
            codec,
        }
    }

    /// Collects flat `(key, value)` pairs.
    ///
    /// Array values are expanded so that the key repeats once per element,
    /// and undefined elements become `Null`. If a key appears more than once, it keeps its first position and its
    /// last value.
    pub fn from_pairs<I, K, V>(pairs: I, codec: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::build(pairs, codec, ArrayFormat::Repeat)
    }

    pub(crate) fn build<I, K, V>(pairs: I, codec: C, array_format: ArrayFormat) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entries = IndexMap::new();
        let mut count = 0usize;
        for (key, value) in pairs {
            count += 1;
            let value: Value = value.into();
            match value {
                Value::Undefined => {}
                Value::Array(items) => {
                    for (key, values) in array_format.expand(key.into(), items) {
                        entries.insert(key, values);
                    }
                }
                value => {
                    entries.insert(key.into(), vec![value]);
                }
            }
        }
        tracing::trace!(pairs = count, keys = entries.len(), "built params");
        Self { entries, codec }
    }

    /// Parses an encoded query string, decoding with `codec`.
    ///
    /// A leading `?` is ignored and empty segments are skipped. A segment
    /// without `=` is read as a key with an empty value. All values are
    /// parsed as [`Value::String`].
    pub fn parse_with_codec(query: &str, codec: C) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut entries: IndexMap<String, Vec<Value>> = IndexMap::new();
        if query.is_empty() {
            return Ok(Self { entries, codec });
        }

        for segment in query.split('&') {
            if segment.is_empty() {
                tracing::debug!("skipping empty query segment");
                continue;
            }
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (codec.decode_key(key)?, codec.decode_value(value)?),
                None => (codec.decode_key(segment)?, Cow::Borrowed("")),
            };
            entries
                .entry(key.into_owned())
                .or_default()
                .push(Value::String(value.into_owned()));
        }

        tracing::trace!(keys = entries.len(), "parsed query string");
        Ok(Self { entries, codec })
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(|values| values.first())
    }

    /// Returns all values for `key`.
    pub fn get_all(&self, key: &str) -> Option<&[Value]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over every `(key, value)` pair, in the order they are
    /// written out.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key.as_str(), value)))
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: Codec + Clone> Params<C> {
    /// Returns a new collection with `value` added after the existing values
    /// of `key`. An undefined value leaves the collection unchanged.
    pub fn append(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.push(key.into(), value.into());
        next
    }

    /// Returns a new collection with all `pairs` appended. Array values add
    /// one value per element, with undefined elements written as empty
    /// values.
    pub fn append_all<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        for (key, value) in pairs {
            let value: Value = value.into();
            match value {
                Value::Array(items) => {
                    let key: String = key.into();
                    for item in items {
                        next.push(key.clone(), item.undefined_as_null());
                    }
                }
                value => next.push(key.into(), value),
            }
        }
        next
    }

    /// Returns a new collection where `key` holds only `value`. Setting an
    /// undefined value removes the key.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        let key: String = key.into();
        let value: Value = value.into();
        match value {
            Value::Undefined => {
                next.entries.shift_remove(&key);
            }
            value => {
                next.entries.insert(key, vec![value]);
            }
        }
        next
    }

    /// Returns a new collection without `key`, or, if `value` is given,
    /// without the values of `key` equal to it.
    pub fn delete(&self, key: &str, value: Option<&Value>) -> Self {
        let mut next = self.clone();
        match value {
            None => {
                next.entries.shift_remove(key);
            }
            Some(value) => {
                if let Some(values) = next.entries.get_mut(key) {
                    values.retain(|v| v != value);
                    if values.is_empty() {
                        next.entries.shift_remove(key);
                    }
                }
            }
        }
        next
    }

    fn push(&mut self, key: String, value: Value) {
        if value.is_undefined() {
            return;
        }
        self.entries.entry(key).or_default().push(value);
    }
}

impl<C: Codec> fmt::Display for Params<C> {
    /// Writes `key=value` pairs joined by `&`, grouped by key. Keys without
    /// values are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, values) in &self.entries {
            if values.is_empty() {
                continue;
            }
            let key = self.codec.encode_key(key);
            for value in values {
                if first {
                    first = false;
                } else {
                    f.write_str("&")?;
                }
                f.write_str(&key)?;
                f.write_str("=")?;
                f.write_str(&self.codec.encode_value(value))?;
            }
        }
        Ok(())
    }
}

impl<C: Codec + Default> FromStr for Params<C> {
    type Err = Error;

    fn from_str(query: &str) -> Result<Self> {
        Self::parse_with_codec(query, C::default())
    }
}
