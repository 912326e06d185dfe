//! Codecs: a reader and a writer for one entity type.

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

use crate::combine::combine_all;
use crate::error::{FieldPath, FieldResult, ValidationError, ValidationErrors};
use crate::read::FromJson;
use crate::value::{kind_of, JsonKind};
use crate::write::ToJson;

/// Reads and writes values of type `T`.
///
/// Codecs hold no mutable state and can be shared between threads.
/// Reading ignores keys the codec does not declare unless wrapped in
/// [`Strict`].
pub trait Format<T>: Send + Sync {
    fn read(&self, value: &Value) -> FieldResult<T>;

    fn write(&self, value: &T) -> Value;

    fn validate(&self, value: &Value) -> bool {
        self.read(value).is_ok()
    }

    /// Reads the value, discarding the errors.
    fn read_opt(&self, value: &Value) -> Option<T> {
        self.read(value).ok()
    }

    /// Keys this codec reads and writes, if it declares them.
    fn fields(&self) -> Option<&[&'static str]> {
        None
    }
}

impl<T, F: Format<T> + ?Sized> Format<T> for &F {
    fn read(&self, value: &Value) -> FieldResult<T> {
        (**self).read(value)
    }

    fn write(&self, value: &T) -> Value {
        (**self).write(value)
    }

    fn fields(&self) -> Option<&[&'static str]> {
        (**self).fields()
    }
}

/// Writes `value` with `format`.
pub fn to_json<T, F: Format<T> + ?Sized>(value: &T, format: &F) -> Value {
    format.write(value)
}

/// Reads a `T` from `value` with `format`.
pub fn from_json<T, F: Format<T> + ?Sized>(value: &Value, format: &F) -> FieldResult<T> {
    format.read(value)
}

// ── FnFormat ───────────────────────────────────────────────────────────────

/// A codec made of two plain functions, usable as a `static`.
///
/// ```
/// use json_format::{combine, obj, FieldResult, FnFormat, Format, JsValueExt, ToJson};
/// use serde_json::Value;
///
/// struct Point { x: i64, y: i64 }
///
/// fn read_point(v: &Value) -> FieldResult<Point> {
///     combine((v.field("x").read::<i64>(), v.field("y").read::<i64>()))
///         .map(|(x, y)| Point { x, y })
/// }
///
/// fn write_point(p: &Point) -> Value {
///     obj([("x", p.x.to_json()), ("y", p.y.to_json())])
/// }
///
/// static POINT: FnFormat<Point> =
///     FnFormat::new(read_point, write_point).with_fields(&["x", "y"]);
///
/// let v = POINT.write(&Point { x: 1, y: 2 });
/// assert_eq!(v.to_string(), r#"{"x":1,"y":2}"#);
/// assert!(POINT.validate(&v));
/// ```
pub struct FnFormat<T> {
    read: fn(&Value) -> FieldResult<T>,
    write: fn(&T) -> Value,
    fields: Option<&'static [&'static str]>,
}

impl<T> FnFormat<T> {
    pub const fn new(read: fn(&Value) -> FieldResult<T>, write: fn(&T) -> Value) -> Self {
        FnFormat {
            read,
            write,
            fields: None,
        }
    }

    /// Declares the keys the codec uses, enabling [`Strict`] checks.
    pub const fn with_fields(self, fields: &'static [&'static str]) -> Self {
        FnFormat {
            read: self.read,
            write: self.write,
            fields: Some(fields),
        }
    }
}

impl<T> Clone for FnFormat<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FnFormat<T> {}

impl<T> fmt::Debug for FnFormat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormat")
            .field("type", &std::any::type_name::<T>())
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T> Format<T> for FnFormat<T> {
    fn read(&self, value: &Value) -> FieldResult<T> {
        (self.read)(value)
    }

    fn write(&self, value: &T) -> Value {
        (self.write)(value)
    }

    fn fields(&self) -> Option<&[&'static str]> {
        self.fields
    }
}

// ── Native ─────────────────────────────────────────────────────────────────

/// The codec of a type that reads and writes itself.
pub struct Native<T>(PhantomData<fn() -> T>);

/// Returns the codec of `T`.
pub const fn native<T: FromJson + ToJson>() -> Native<T> {
    Native(PhantomData)
}

impl<T> Clone for Native<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Native<T> {}

impl<T> fmt::Debug for Native<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Native<{}>", std::any::type_name::<T>())
    }
}

impl<T: FromJson + ToJson> Format<T> for Native<T> {
    fn read(&self, value: &Value) -> FieldResult<T> {
        T::from_json(value)
    }

    fn write(&self, value: &T) -> Value {
        value.to_json()
    }
}

// ── Strict ─────────────────────────────────────────────────────────────────

/// What reading does with keys a codec does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    #[default]
    Ignore,
    Reject,
}

/// Applies an [`UnknownFields`] policy on top of a codec.
///
/// Rejection needs the inner codec to declare its [`fields`](Format::fields);
/// codecs that declare nothing are read leniently. Only the top-level object
/// is checked: nested codecs need their own wrapper.
#[derive(Debug, Clone, Copy)]
pub struct Strict<F> {
    inner: F,
    policy: UnknownFields,
}

impl<F> Strict<F> {
    pub fn new(inner: F, policy: UnknownFields) -> Self {
        Strict { inner, policy }
    }

    pub fn policy(&self) -> UnknownFields {
        self.policy
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<T, F: Format<T>> Format<T> for Strict<F> {
    fn read(&self, value: &Value) -> FieldResult<T> {
        let result = self.inner.read(value);
        let declared = match (self.policy, self.inner.fields()) {
            (UnknownFields::Reject, Some(declared)) => declared,
            _ => return result,
        };
        let unknown: Vec<ValidationError> = value
            .as_object()
            .into_iter()
            .flat_map(|map| map.keys())
            .filter(|key| !declared.iter().any(|d| *d == key.as_str()))
            .map(|key| ValidationError::unknown_field().at(key.as_str()))
            .collect();
        if unknown.is_empty() {
            return result;
        }
        tracing::trace!(count = unknown.len(), "rejecting undeclared fields");
        match result {
            Ok(_) => Err(ValidationErrors::from_nonempty(unknown)),
            Err(mut errors) => {
                for error in unknown {
                    errors.push(error);
                }
                Err(errors)
            }
        }
    }

    fn write(&self, value: &T) -> Value {
        self.inner.write(value)
    }

    fn fields(&self) -> Option<&[&'static str]> {
        self.inner.fields()
    }
}

// ── Mapped ─────────────────────────────────────────────────────────────────

/// A codec for `U` derived from a codec for `T`.
pub struct Mapped<F, T, U> {
    inner: F,
    to: fn(T) -> U,
    from: fn(&U) -> T,
}

impl<F: fmt::Debug, T, U> fmt::Debug for Mapped<F, T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapped").field("inner", &self.inner).finish()
    }
}

impl<F, T, U> Format<U> for Mapped<F, T, U>
where
    F: Format<T>,
{
    fn read(&self, value: &Value) -> FieldResult<U> {
        self.inner.read(value).map(self.to)
    }

    fn write(&self, value: &U) -> Value {
        self.inner.write(&(self.from)(value))
    }

    fn fields(&self) -> Option<&[&'static str]> {
        self.inner.fields()
    }
}

// ── ListOf / Nullable ──────────────────────────────────────────────────────

/// Arrays of values read and written with an element codec.
#[derive(Debug, Clone, Copy)]
pub struct ListOf<F>(F);

/// Reads and writes `Vec<T>` with an element codec; element errors are
/// reported under their index.
pub fn list_of<F>(format: F) -> ListOf<F> {
    ListOf(format)
}

impl<T, F: Format<T>> Format<Vec<T>> for ListOf<F> {
    fn read(&self, value: &Value) -> FieldResult<Vec<T>> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ValidationError::type_mismatch(JsonKind::Array, kind_of(other)).into())
            }
        };
        combine_all(items.iter().enumerate().map(|(i, item)| {
            self.0
                .read(item)
                .map_err(|e| e.rerooted(&FieldPath::root().child(i)))
        }))
    }

    fn write(&self, value: &Vec<T>) -> Value {
        Value::Array(value.iter().map(|item| self.0.write(item)).collect())
    }
}

/// `Option<T>` with an inner codec; `null` is `None`.
#[derive(Debug, Clone, Copy)]
pub struct Nullable<F>(F);

pub fn nullable<F>(format: F) -> Nullable<F> {
    Nullable(format)
}

impl<T, F: Format<T>> Format<Option<T>> for Nullable<F> {
    fn read(&self, value: &Value) -> FieldResult<Option<T>> {
        match value {
            Value::Null => Ok(None),
            other => self.0.read(other).map(Some),
        }
    }

    fn write(&self, value: &Option<T>) -> Value {
        match value {
            Some(v) => self.0.write(v),
            None => Value::Null,
        }
    }
}

// ── Combinators on codecs ──────────────────────────────────────────────────

/// Adapters available on every codec.
pub trait FormatExt<T>: Format<T> + Sized {
    /// Rejects keys the codec does not declare.
    fn strict(self) -> Strict<Self> {
        Strict::new(self, UnknownFields::Reject)
    }

    fn with_unknown_fields(self, policy: UnknownFields) -> Strict<Self> {
        Strict::new(self, policy)
    }

    /// Derives a codec for `U` through a pair of conversions.
    fn map<U>(self, to: fn(T) -> U, from: fn(&U) -> T) -> Mapped<Self, T, U> {
        Mapped {
            inner: self,
            to,
            from,
        }
    }
}

impl<T, F: Format<T>> FormatExt<T> for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Celsius(f64);

    #[test]
    fn native_round_trip() {
        let f = native::<Vec<i32>>();
        let v = f.write(&vec![1, 2, 3]);
        assert_eq!(f.read(&v).unwrap(), vec![1, 2, 3]);
        assert!(!f.validate(&json!("nope")));
        assert_eq!(f.read_opt(&json!([4])), Some(vec![4]));
    }

    #[test]
    fn mapped_codec() {
        let f = native::<f64>().map(Celsius, |c: &Celsius| c.0);
        assert_eq!(f.read(&json!(21.5)).unwrap(), Celsius(21.5));
        assert_eq!(f.write(&Celsius(-4.0)), json!(-4.0));
    }

    #[test]
    fn list_of_reroots_by_index() {
        let f = list_of(native::<String>());
        let err = f.read(&json!(["a", 1, "c", false])).unwrap_err();
        assert_eq!(err.paths(), ["[1]", "[3]"]);
        let err = f.read(&json!({"a": 1})).unwrap_err();
        assert_eq!(
            err.as_slice()[0].kind(),
            &ErrorKind::TypeMismatch {
                expected: JsonKind::Array,
                found: JsonKind::Object
            }
        );
        assert_eq!(f.write(&vec!["x".to_string()]), json!(["x"]));
    }

    #[test]
    fn nullable_codec() {
        let f = nullable(native::<u8>());
        assert_eq!(f.read(&json!(null)).unwrap(), None);
        assert_eq!(f.read(&json!(3)).unwrap(), Some(3));
        assert_eq!(f.write(&None), Value::Null);
    }

    #[test]
    fn strict_without_declared_fields_is_lenient() {
        let f = native::<Value>().strict();
        assert!(f.validate(&json!({"anything": 1})));
    }

    #[test]
    fn ignore_policy_is_default() {
        assert_eq!(UnknownFields::default(), UnknownFields::Ignore);
    }

    #[test]
    fn codecs_are_shareable() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        assert_send_sync(&native::<String>());
        assert_send_sync(&list_of(native::<String>()).strict());
    }
}
