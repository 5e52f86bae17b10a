use serde::ser;

use crate::codec::{Codec, ParamEncoder};
use crate::error::Result;
use crate::flatten::Flattener;
use crate::params::Params;
use crate::ser::to_value;
use crate::value::Value;

/// Configuration for flattening and parameter building.
///
/// The `Config` struct lets you customize how nested keys are joined and how
/// arrays are written out.
///
/// ## Key separator
///
/// Nested keys are joined with `.` by default, so `{ a: { b: 1 } }` becomes
/// `a.b=1`.
///
/// ```
/// use serde_params::Config;
/// use serde_json::json;
///
/// let config = Config::new().key_separator("_");
/// let query = config.serialize_string(&json!({ "a": { "b": 1 } })).unwrap();
/// assert_eq!(query, "a_b=1");
/// ```
///
/// ## Arrays
///
/// Arrays are never flattened into dotted keys. When building parameters
/// each element is written under the array's key, as controlled by
/// [`ArrayFormat`].
///
/// ```
/// use serde_params::{ArrayFormat, Config};
/// use serde_json::json;
///
/// let value = json!({ "ids": [1, 2] });
/// assert_eq!(Config::new().serialize_string(&value).unwrap(), "ids=1&ids=2");
///
/// let config = Config::new().array_format(ArrayFormat::Indexed);
/// assert_eq!(config.serialize_string(&value).unwrap(), "ids%5B0%5D=1&ids%5B1%5D=2");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Config {
    key_separator: &'static str,
    array_format: ArrayFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrayFormat {
    /// Use the `a=1&a=2` format.
    #[default]
    Repeat,
    /// Use the `a[0]=1&a[1]=2` format.
    Indexed,
    /// Use the `a[]=1&a[]=2` format.
    Brackets,
}

impl ArrayFormat {
    /// Expands the elements of an array stored under `key` into keyed values.
    ///
    /// Undefined elements are stored as `Null`, so they write an empty value.
    pub(crate) fn expand(self, key: String, items: Vec<Value>) -> Vec<(String, Vec<Value>)> {
        let items: Vec<Value> = items.into_iter().map(Value::undefined_as_null).collect();
        match self {
            ArrayFormat::Repeat => vec![(key, items)],
            ArrayFormat::Brackets => vec![(key + "[]", items)],
            ArrayFormat::Indexed => {
                let mut buffer = itoa::Buffer::new();
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        let indexed = [key.as_str(), "[", buffer.format(idx), "]"].concat();
                        (indexed, vec![item])
                    })
                    .collect()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            key_separator: ".",
            array_format: ArrayFormat::Repeat,
        }
    }

    /// Specifies the string used to join nested keys. Default is `.`.
    pub const fn key_separator(mut self, key_separator: &'static str) -> Self {
        self.key_separator = key_separator;
        self
    }

    /// Specifies how arrays are keyed when building parameters.
    ///
    /// The default is `Repeat`, which results in `a=1&a=2`.
    pub const fn array_format(mut self, array_format: ArrayFormat) -> Self {
        self.array_format = array_format;
        self
    }

    /// Flattens a value into `(key, value)` pairs using this `Config`.
    pub fn flatten<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<Vec<(String, Value)>> {
        let value = to_value(input)?;
        Flattener::new(self.key_separator).flatten_value(value)
    }

    /// Builds parameters from a value using this `Config` and the default
    /// [`ParamEncoder`].
    pub fn params<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<Params> {
        self.params_with_codec(input, ParamEncoder)
    }

    /// Builds parameters from a value using this `Config`, encoding with
    /// `codec`.
    pub fn params_with_codec<T, C>(self, input: &T, codec: C) -> Result<Params<C>>
    where
        T: ser::Serialize + ?Sized,
        C: Codec,
    {
        let pairs = self.flatten(input)?;
        Ok(Params::build(pairs, codec, self.array_format))
    }

    /// Serializes a value into a querystring using this `Config`.
    pub fn serialize_string<T: ser::Serialize + ?Sized>(self, input: &T) -> Result<String> {
        Ok(self.params(input)?.to_string())
    }
}
