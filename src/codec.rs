//! Encoding policies for parameter keys and values.
//!
//! A [`Params`](crate::Params) collection carries its codec, and every key
//! and value it writes goes through that codec.

use std::borrow::Cow;
use std::fmt;

use crate::encode::{decode_component, encode_component, encode_standard};
use crate::error::Result;
use crate::value::Value;

/// Encodes and decodes the keys and values of a query string.
///
/// Only [`encode_value`](Codec::encode_value) has to be provided. Keys are
/// percent-encoded with the readable reserved characters (`@ : $ , ; + ? /`)
/// left untouched, and decoding reverses percent-encoding without turning
/// `+` into a space.
pub trait Codec {
    fn encode_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        encode_standard(key)
    }

    fn encode_value<'a>(&self, value: &'a Value) -> Cow<'a, str>;

    fn decode_key<'a>(&self, key: &'a str) -> Result<Cow<'a, str>> {
        decode_component(key)
    }

    fn decode_value<'a>(&self, value: &'a str) -> Result<Cow<'a, str>> {
        decode_component(value)
    }
}

impl<C: Codec + ?Sized> Codec for &C {
    fn encode_key<'a>(&self, key: &'a str) -> Cow<'a, str> {
        (**self).encode_key(key)
    }

    fn encode_value<'a>(&self, value: &'a Value) -> Cow<'a, str> {
        (**self).encode_value(value)
    }

    fn decode_key<'a>(&self, key: &'a str) -> Result<Cow<'a, str>> {
        (**self).decode_key(key)
    }

    fn decode_value<'a>(&self, value: &'a str) -> Result<Cow<'a, str>> {
        (**self).decode_value(value)
    }
}

/// Encodes a single value for use in a query component.
///
/// `Undefined` and `Null` become an empty string, dates are written as
/// ISO-8601 (`2020-02-07T07:45:20.554Z`) and everything else uses its
/// [param string](Value::to_param_string). The result is URI-component
/// encoded, so `&`, `=`, `+`, `#`, spaces and non-ASCII characters are all
/// escaped.
///
/// ```
/// use serde_params::{encode_value, Value};
///
/// assert_eq!(encode_value(&Value::Null), "");
/// assert_eq!(encode_value(&Value::from("a+b c")), "a%2Bb%20c");
/// assert_eq!(encode_value(&Value::from(1.5)), "1.5");
/// ```
pub fn encode_value(value: &Value) -> Cow<'_, str> {
    match value.to_param_string() {
        Cow::Borrowed(s) => encode_component(s),
        Cow::Owned(s) => Cow::Owned(encode_component(&s).into_owned()),
    }
}

/// The default codec: values are fully URI-component encoded with
/// [`encode_value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamEncoder;

impl Codec for ParamEncoder {
    fn encode_value<'a>(&self, value: &'a Value) -> Cow<'a, str> {
        encode_value(value)
    }
}

/// Encodes values the same way as keys.
///
/// Reserved characters like `+` and `,` are written verbatim. Some servers
/// decode `+` as a space, so prefer [`ParamEncoder`] unless the receiving
/// end is known to treat `+` literally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardCodec;

impl Codec for StandardCodec {
    fn encode_value<'a>(&self, value: &'a Value) -> Cow<'a, str> {
        match value.to_param_string() {
            Cow::Borrowed(s) => encode_standard(s),
            Cow::Owned(s) => Cow::Owned(encode_standard(&s).into_owned()),
        }
    }
}

/// A codec which encodes values with a plain function.
///
/// ```
/// use serde_params::{FnEncoder, Params, Value};
///
/// let upper = FnEncoder::new(|v: &Value| v.to_param_string().to_uppercase());
/// let params = Params::with_codec(upper).append("name", "alice");
/// assert_eq!(params.to_string(), "name=ALICE");
/// ```
#[derive(Clone, Copy)]
pub struct FnEncoder<F> {
    encode: F,
}

impl<F> FnEncoder<F>
where
    F: Fn(&Value) -> String,
{
    pub fn new(encode: F) -> Self {
        Self { encode }
    }
}

impl<F> fmt::Debug for FnEncoder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEncoder").finish_non_exhaustive()
    }
}

impl<F> Codec for FnEncoder<F>
where
    F: Fn(&Value) -> String,
{
    fn encode_value<'a>(&self, value: &'a Value) -> Cow<'a, str> {
        Cow::Owned((self.encode)(value))
    }
}
