//! Flatten serde data into dotted-key query parameters
//!
//! Many HTTP APIs accept nested filters as flat query parameters whose keys
//! are joined with dots, e.g. `filter.status=open&filter.owner.id=7`.
//! This crate turns any `Serialize` value into such parameters.
//!
//! Flattening happens in two steps:
//!
//! 1. The value is captured as a [`Value`] tree, and [`flatten_object`]
//!    walks it into `(dotted key, value)` pairs.
//! 2. [`http_params`] collects the pairs into [`Params`], an immutable
//!    parameter collection which writes itself out as a querystring through
//!    its [`Codec`].
//!
//! ## Supported Types
//!
//! At the **top level**, only `struct`s, maps and enum variants with data
//! can be flattened, since every parameter needs a key.
//!
//! Below the top level:
//!
//! * nested structs and maps are flattened into dotted keys
//! * sequences are kept whole and write one parameter per element
//! * `Option::None` leaves the field out entirely
//! * `()` writes the key with an empty value
//! * dates annotated with [`helpers::iso_date`] are written as ISO-8601
//!
//! ## Usage
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Address {
//!     city: String,
//!     postcode: Option<String>,
//! }
//!
//! #[derive(Serialize)]
//! struct QueryParams {
//!     id: u8,
//!     name: String,
//!     address: Address,
//!     user_ids: Vec<u8>,
//!     cursor: (),
//! }
//!
//! # fn main() {
//! let params = QueryParams {
//!     id: 42,
//!     name: "Acme & Co".to_string(),
//!     address: Address {
//!         city: "Carrot City".to_string(),
//!         postcode: None,
//!     },
//!     user_ids: vec![1, 2],
//!     cursor: (),
//! };
//!
//! let query = serde_params::http_params(&params).unwrap();
//! assert_eq!(
//!     query.to_string(),
//!     "id=42&name=Acme%20%26%20Co&address.city=Carrot%20City&user_ids=1&user_ids=2&cursor="
//! );
//! assert_eq!(query.get("address.city").unwrap(), "Carrot City");
//! # }
//! ```

mod codec;
mod config;
mod encode;
mod error;
mod flatten;
pub mod helpers;
mod params;
mod ser;
mod value;

#[doc(inline)]
pub use codec::{Codec, FnEncoder, ParamEncoder, StandardCodec, encode_value};
pub use config::{ArrayFormat, Config};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use flatten::{flatten, flatten_object};
#[doc(inline)]
pub use params::{Params, http_params};
#[doc(inline)]
pub use ser::{ValueSerializer, to_value};
#[doc(inline)]
pub use value::{Kind, Map, Number, Value};
