//! Serialization support for capturing data as a [`Value`] tree.

mod key;

use key::KeySerializer;

use chrono::{DateTime, Utc};
use serde::ser;

use crate::error::*;
use crate::value::{DATE_TOKEN, Map, Value};

/// Captures any serializable value as a [`Value`].
///
/// `Option::None` becomes [`Value::Undefined`] and `()` becomes
/// [`Value::Null`]. Struct fields and map entries keep the order they were
/// serialized in.
///
/// ```
/// # use serde::Serialize;
/// use serde_params::Value;
///
/// #[derive(Serialize)]
/// struct Query {
///     name: String,
///     page: Option<u32>,
/// }
///
/// let value = serde_params::to_value(&Query { name: "Alice".into(), page: None }).unwrap();
/// let map = value.as_map().unwrap();
/// assert_eq!(map["name"], "Alice");
/// assert_eq!(map["page"], Value::Undefined);
/// ```
pub fn to_value<T: ser::Serialize + ?Sized>(input: &T) -> Result<Value> {
    input.serialize(ValueSerializer)
}

/// A serializer producing [`Value`] trees.
///
/// Scalars become leaves, sequences become [`Value::Array`] and structs,
/// maps and enum variants with data become [`Value::Map`]. A variant with
/// data is captured as a single-entry map keyed by the variant name, so
/// `Filter::Range { lo: 1, hi: 2 }` flattens to `range.lo=1&range.hi=2`.
pub struct ValueSerializer;

macro_rules! serialize_number {
    (
        $($ty:ty => $meth:ident,)*) => {
        $(
            fn $meth(self, v: $ty) -> Result<Self::Ok> {
                Ok(Value::Number(v.into()))
            }
        )*
    };
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;
    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    serialize_number! {
        u8  => serialize_u8,
        u16 => serialize_u16,
        u32 => serialize_u32,
        u64 => serialize_u64,
        i8  => serialize_i8,
        i16 => serialize_i16,
        i32 => serialize_i32,
        i64 => serialize_i64,
        f32 => serialize_f32,
        f64 => serialize_f64,
    }

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Value::Bool(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<Self::Ok> {
        Ok(Value::String(String::from_utf8_lossy(value).into_owned()))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Value::Undefined)
    }

    fn serialize_some<T: ?Sized + ser::Serialize>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + ser::Serialize>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        let inner = value.serialize(self)?;
        if name == DATE_TOKEN {
            into_date(inner)
        } else {
            Ok(inner)
        }
    }

    fn serialize_newtype_variant<T: ?Sized + ser::Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: SerializeVec::new(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(SerializeMap::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(SerializeMap::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            fields: SerializeMap::new(len),
        })
    }
}

/// Turns the string carried by a date-tagged newtype into a [`Value::Date`].
fn into_date(inner: Value) -> Result<Value> {
    match inner {
        Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
            Ok(date) => Ok(Value::Date(date.with_timezone(&Utc))),
            Err(source) => Err(Error::InvalidDate { value: s, source }),
        },
        other => Ok(other),
    }
}

#[doc(hidden)]
pub struct SerializeVec {
    items: Vec<Value>,
}

impl SerializeVec {
    fn new(len: usize) -> Self {
        Self {
            items: Vec::with_capacity(len),
        }
    }

    fn push<T: ser::Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Array(self.items))
    }
}

#[doc(hidden)]
pub struct SerializeTupleVariant {
    variant: &'static str,
    items: SerializeVec,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.items.push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_owned(), Value::Array(self.items.items));
        Ok(Value::Map(map))
    }
}

#[doc(hidden)]
pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

impl SerializeMap {
    fn new(len: usize) -> Self {
        Self {
            map: Map::with_capacity(len),
            next_key: None,
        }
    }

    fn insert<T: ser::Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<()> {
        // a repeated key keeps its first position and takes the last value
        self.map.insert(key, to_value(value)?);
        Ok(())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        let Some(key) = self.next_key.take() else {
            return Err(Error::Custom(
                "internal error: value serialized before its key".to_string(),
            ));
        };
        self.insert(key, value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Value::Map(self.map))
    }
}

#[doc(hidden)]
pub struct SerializeStructVariant {
    variant: &'static str,
    fields: SerializeMap,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ser::Serialize + ?Sized,
    {
        self.fields.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<Self::Ok> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_owned(), Value::Map(self.fields.map));
        Ok(Value::Map(map))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[test]
    fn options_and_units() {
        #[derive(Serialize)]
        struct Query {
            a: Option<u8>,
            b: (),
            c: Option<u8>,
        }

        let value = to_value(&Query {
            a: None,
            b: (),
            c: Some(3),
        })
        .unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map["a"], Value::Undefined);
        assert_eq!(map["b"], Value::Null);
        assert_eq!(map["c"], Value::from(3u8));
    }

    #[test]
    fn enum_variants() {
        #[derive(Serialize)]
        #[serde(rename_all = "lowercase")]
        enum Filter {
            All,
            Id(u32),
            Range { lo: u8, hi: u8 },
            Pair(u8, u8),
        }

        assert_eq!(to_value(&Filter::All).unwrap(), "all");
        assert_eq!(
            to_value(&Filter::Id(7)).unwrap(),
            Value::from_iter([("id", 7u32)])
        );
        assert_eq!(
            to_value(&Filter::Range { lo: 1, hi: 2 }).unwrap(),
            Value::from_iter([("range", Value::from_iter([("lo", 1u8), ("hi", 2u8)]))])
        );
        assert_eq!(
            to_value(&Filter::Pair(1, 2)).unwrap(),
            Value::from_iter([("pair", vec![1u8, 2])])
        );
    }

    #[test]
    fn integer_keys_become_strings() {
        let mut map = BTreeMap::new();
        map.insert(1u32, "one");
        map.insert(20u32, "twenty");
        let value = to_value(&map).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "20"]);
    }

    #[test]
    fn float_keys_print_like_values() {
        struct FloatKeys;

        impl Serialize for FloatKeys {
            fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap;

                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(&1.0f64, "one")?;
                map.serialize_entry(&0.5f32, "half")?;
                map.serialize_entry(&0.000001f64, "tiny")?;
                map.end()
            }
        }

        let value = to_value(&FloatKeys).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1", "0.5", "0.000001"]);
    }

    #[test]
    fn sequence_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1u8);
        let err = to_value(&map).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKey(_)), "got: {err}");
    }

    #[test]
    fn invalid_dates_are_rejected() {
        struct NotADate;

        impl Serialize for NotADate {
            fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_newtype_struct(DATE_TOKEN, "yesterday")
            }
        }

        let err = to_value(&NotADate).unwrap_err();
        assert!(
            err.to_string().contains("invalid date `yesterday`"),
            "got: {err}"
        );
    }
}
