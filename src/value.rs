//! The captured representation of serialized data.
//!
//! Every `Serialize` input is first captured as a [`Value`] tree. The
//! flattener and the parameter collection then only ever branch on the
//! explicit [`Kind`] of a value instead of guessing at its shape.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An insertion-ordered map of values.
pub type Map = IndexMap<String, Value>;

/// Newtype-struct name used to tag dates when they pass through a
/// serializer. Any serializer other than ours sees a plain string.
pub(crate) const DATE_TOKEN: &str = "$serde_params::private::Date";

/// A single node of captured data.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A missing value (`Option::None`). Never emitted as a parameter.
    Undefined,
    /// An explicit empty value (`()`). Emitted with an empty string.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    /// Arrays are leaves: they are expanded into repeated keys, never
    /// flattened into dotted ones.
    Array(Vec<Value>),
    Map(Map),
}

/// The shape of a [`Value`], as seen by the flattener.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Null,
    Scalar,
    Date,
    Array,
    Record,
}

impl Value {
    /// Classifies the value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Kind::Scalar,
            Value::Date(_) => Kind::Date,
            Value::Array(_) => Kind::Array,
            Value::Map(_) => Kind::Record,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Turns `Undefined` into `Null`, leaving other values as they are.
    pub(crate) fn undefined_as_null(self) -> Value {
        match self {
            Value::Undefined => Value::Null,
            other => other,
        }
    }

    /// The plain (not yet percent-encoded) string form of the value.
    ///
    /// - `Undefined` and `Null` render as an empty string
    /// - numbers render the way JavaScript prints them (`1.0` is `1`)
    /// - dates render as `YYYY-MM-DDTHH:MM:SS.sssZ`
    /// - arrays render their elements joined with `,`
    /// - maps have no string form and render as an empty string
    pub fn to_param_string(&self) -> Cow<'_, str> {
        match self {
            Value::Undefined | Value::Null | Value::Map(_) => Cow::Borrowed(""),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::String(s) => Cow::Borrowed(s),
            Value::Date(date) => Cow::Owned(iso_string(date)),
            Value::Array(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| item.to_param_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        }
    }
}

/// Formats a date as ISO-8601 in UTC with millisecond precision.
pub(crate) fn iso_string(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Undefined => serializer.serialize_none(),
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(date) => serializer.serialize_newtype_struct(DATE_TOKEN, &iso_string(date)),
            Value::Array(items) => items.serialize(serializer),
            Value::Map(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
        }
    }
}

/// A numeric value.
#[derive(Clone, Copy, PartialEq)]
pub struct Number {
    n: N,
}

#[derive(Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    /// Always less than zero.
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn from_f64(f: f64) -> Self {
        Number { n: N::Float(f) }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            N::PosInt(u) => i64::try_from(u).ok(),
            N::NegInt(i) => Some(i),
            N::Float(_) => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            N::PosInt(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self.n {
            N::PosInt(u) => u as f64,
            N::NegInt(i) => i as f64,
            N::Float(f) => f,
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            N::PosInt(u) => f.write_str(itoa::Buffer::new().format(u)),
            N::NegInt(i) => f.write_str(itoa::Buffer::new().format(i)),
            N::Float(v) => fmt_float(v, f),
        }
    }
}

/// Mirrors `Number.prototype.toString` closely enough for query strings:
/// integral floats have no fractional part and exponents carry a sign.
fn fmt_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        return f.write_str("0");
    }
    if v.fract() == 0.0 && v.abs() < 1e21 {
        return write!(f, "{v:.0}");
    }
    // ryu switches to exponents below 1e-5, JavaScript only below 1e-6
    if (1e-6..1e-5).contains(&v.abs()) {
        return write!(f, "{v}");
    }

    let mut buffer = ryu::Buffer::new();
    let formatted = buffer.format_finite(v);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => {
            let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
            write!(f, "{mantissa}e+{exp}")
        }
        _ => f.write_str(formatted),
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.n {
            N::PosInt(u) => serializer.serialize_u64(u),
            N::NegInt(i) => serializer.serialize_i64(i),
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

macro_rules! from_unsigned {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(u: $ty) -> Self {
                    Number { n: N::PosInt(u as u64) }
                }
            }

            impl From<$ty> for Value {
                fn from(u: $ty) -> Self {
                    Value::Number(u.into())
                }
            }
        )*
    };
}

macro_rules! from_signed {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(i: $ty) -> Self {
                    let n = if i < 0 {
                        N::NegInt(i as i64)
                    } else {
                        N::PosInt(i as u64)
                    };
                    Number { n }
                }
            }

            impl From<$ty> for Value {
                fn from(i: $ty) -> Self {
                    Value::Number(i.into())
                }
            }
        )*
    };
}

from_unsigned! { u8 u16 u32 u64 usize }
from_signed! { i8 i16 i32 i64 isize }

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::from_f64(f)
    }
}

impl From<f32> for Number {
    fn from(f: f32) -> Self {
        // go through the shortest decimal representation so that `0.1f32`
        // prints as `0.1` rather than `0.10000000149011612`
        if f.is_finite() {
            let mut buffer = ryu::Buffer::new();
            if let Ok(parsed) = buffer.format_finite(f).parse::<f64>() {
                return Number::from_f64(parsed);
            }
        }
        Number::from_f64(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f.into())
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Number(f.into())
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::String(s.into_owned())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(date: DateTime<Tz>) -> Self {
        Value::Date(date.with_timezone(&Utc))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
