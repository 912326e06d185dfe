//! Typed, bidirectional JSON codecs with accumulated validation errors.
//!
//! # Overview
//!
//! A codec ([`Format`]) pairs a fallible reader (JSON value to `T`) with a
//! total writer (`T` to JSON value). Readers are built from per-field reads
//! that are merged with [`combine`]: every failing field contributes its
//! errors, so one pass reports all of them. Errors read through a nested
//! codec are re-rooted under the enclosing field (`address.street`).
//!
//! The JSON value tree is `serde_json::Value`, with object keys kept in
//! insertion order.
//!
//! # Example
//!
//! ```
//! use json_format::{combine, obj, FieldResult, FnFormat, Format, JsValueExt, ToJson};
//! use serde_json::{json, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Address { number: String, street: String, city: String }
//!
//! fn read_address(v: &Value) -> FieldResult<Address> {
//!     combine((
//!         v.field("number").read::<String>(),
//!         v.field("street").read::<String>(),
//!         v.field("city").read::<String>(),
//!     ))
//!     .map(|(number, street, city)| Address { number, street, city })
//! }
//!
//! fn write_address(a: &Address) -> Value {
//!     obj([
//!         ("number", a.number.to_json()),
//!         ("street", a.street.to_json()),
//!         ("city", a.city.to_json()),
//!     ])
//! }
//!
//! static ADDRESS: FnFormat<Address> = FnFormat::new(read_address, write_address);
//!
//! let person = json!({"name": "John", "address": {"number": 123}});
//! let err = person.field("address").read_with(&ADDRESS).unwrap_err();
//! assert_eq!(err.paths(), ["address.number", "address.street", "address.city"]);
//! ```

pub mod combine;
pub mod error;
pub mod field;
pub mod format;
pub mod payload;
pub mod read;
pub mod value;
pub mod write;

pub use combine::{combine, combine_all, Combine};
pub use error::{ErrorKind, FieldPath, FieldResult, PathSegment, ValidationError, ValidationErrors};
pub use field::{FieldRef, JsValueExt};
pub use format::{
    from_json, list_of, native, nullable, to_json, FnFormat, Format, FormatExt, ListOf, Mapped,
    Native, Nullable, Strict, UnknownFields,
};
pub use payload::{JsonBody, PayloadError, APPLICATION_JSON};
pub use read::FromJson;
pub use value::{kind_of, obj, JsonKind};
pub use write::ToJson;
