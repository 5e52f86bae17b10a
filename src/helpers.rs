//! Serde helpers for fields that should be flattened as dates.

/// Serialize/deserialize a `DateTime` as an ISO-8601 date
///
/// The date is converted to UTC and written with millisecond precision,
/// e.g. `2020-02-07T07:45:20.554Z`. This crate's serializer captures it as a
/// [`Value::Date`](crate::Value::Date); any other serializer simply sees a
/// string.
///
/// ## Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Deserialize, Serialize)]
/// struct Query {
///     #[serde(with = "serde_params::helpers::iso_date")]
///     since: DateTime<Utc>,
/// }
///
/// # fn main(){
/// let query = Query {
///     since: DateTime::from_timestamp_millis(1_581_061_520_554).unwrap(),
/// };
/// let params = serde_params::http_params(&query).unwrap();
/// assert_eq!(params.to_string(), "since=2020-02-07T07%3A45%3A20.554Z");
///
/// let json = serde_json::to_string(&query).unwrap();
/// assert_eq!(json, r#"{"since":"2020-02-07T07:45:20.554Z"}"#);
/// assert_eq!(serde_json::from_str::<Query>(&json).unwrap(), query);
/// # }
/// ```
pub mod iso_date {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::borrow::Cow;

    use crate::value::{DATE_TOKEN, iso_string};

    pub fn serialize<S, Tz>(date: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        Tz: TimeZone,
    {
        let iso = iso_string(&date.with_timezone(&Utc));
        serializer.serialize_newtype_struct(DATE_TOKEN, &iso)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Cow<'_, str> = Deserialize::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Serialize/deserialize an optional `DateTime` as an ISO-8601 date
///
/// `None` is left out of the flattened parameters entirely.
///
/// ## Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Query {
///     #[serde(with = "serde_params::helpers::iso_date_option")]
///     from: Option<DateTime<Utc>>,
///     #[serde(with = "serde_params::helpers::iso_date_option")]
///     to: Option<DateTime<Utc>>,
/// }
///
/// # fn main(){
/// let query = Query {
///     from: DateTime::from_timestamp_millis(0),
///     to: None,
/// };
/// let params = serde_params::http_params(&query).unwrap();
/// assert_eq!(params.to_string(), "from=1970-01-01T00%3A00%3A00.000Z");
/// # }
/// ```
pub mod iso_date_option {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::borrow::Cow;

    struct IsoDate<'a, Tz: TimeZone>(&'a DateTime<Tz>);

    impl<Tz: TimeZone> Serialize for IsoDate<'_, Tz> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::iso_date::serialize(self.0, serializer)
        }
    }

    pub fn serialize<S, Tz>(date: &Option<DateTime<Tz>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        Tz: TimeZone,
    {
        match date {
            Some(date) => serializer.serialize_some(&IsoDate(date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<Cow<'_, str>> = Deserialize::deserialize(deserializer)?;
        s.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|date| date.with_timezone(&Utc))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
