//! Field access: locating a child value and reading it with error paths
//! attributed to that child.

use serde_json::Value;

use crate::error::{FieldPath, FieldResult, PathSegment, ValidationError};
use crate::format::Format;
use crate::read::FromJson;

/// A possibly-missing child value together with its path.
///
/// Looking up a field never fails; a missing field only becomes an error
/// when it is read, so several missing fields can be reported at once.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef<'a> {
    path: FieldPath,
    value: Option<&'a Value>,
}

impl<'a> FieldRef<'a> {
    /// A reference to `value` itself, at the root path.
    pub fn root(value: &'a Value) -> Self {
        FieldRef {
            path: FieldPath::root(),
            value: Some(value),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The referenced value, if present.
    pub fn get(&self) -> Option<&'a Value> {
        self.value
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }

    /// Looks up `name`; missing if this value is missing, not an object, or
    /// has no such key.
    pub fn field(&self, name: &str) -> FieldRef<'a> {
        FieldRef {
            path: self.path.child(name),
            value: self
                .value
                .and_then(Value::as_object)
                .and_then(|map| map.get(name)),
        }
    }

    /// Looks up array element `index`.
    pub fn at(&self, index: usize) -> FieldRef<'a> {
        FieldRef {
            path: self.path.child(PathSegment::Index(index)),
            value: self
                .value
                .and_then(Value::as_array)
                .and_then(|items| items.get(index)),
        }
    }

    fn missing<T>(&self) -> FieldResult<T> {
        Err(ValidationError::missing_field().at(self.path.clone()).into())
    }

    /// Reads the value as `T`.
    pub fn read<T: FromJson>(&self) -> FieldResult<T> {
        match self.value {
            None => self.missing(),
            Some(v) => T::from_json(v).map_err(|e| e.rerooted(&self.path)),
        }
    }

    /// Reads the value with a codec, re-rooting the codec's errors here.
    pub fn read_with<T, F>(&self, format: &F) -> FieldResult<T>
    where
        F: Format<T> + ?Sized,
    {
        match self.value {
            None => self.missing(),
            Some(v) => format.read(v).map_err(|e| e.rerooted(&self.path)),
        }
    }

    /// Like [`read`](Self::read), but a missing field or `null` is `None`.
    pub fn read_opt<T: FromJson>(&self) -> FieldResult<Option<T>> {
        match self.value {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.read().map(Some),
        }
    }

    /// Like [`read_with`](Self::read_with), but a missing field or `null`
    /// is `None`.
    pub fn read_opt_with<T, F>(&self, format: &F) -> FieldResult<Option<T>>
    where
        F: Format<T> + ?Sized,
    {
        match self.value {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.read_with(format).map(Some),
        }
    }

    /// Reads the value, or returns `default` when the field is missing.
    /// A present but invalid value is still an error.
    pub fn read_or<T: FromJson>(&self, default: T) -> FieldResult<T> {
        match self.value {
            None => Ok(default),
            Some(_) => self.read(),
        }
    }

    /// Reads the value and checks it with `predicate`; a rejected value is
    /// an `InvalidValue` error carrying `message`.
    ///
    /// ```
    /// use json_format::JsValueExt;
    /// use serde_json::json;
    ///
    /// let v = json!({"age": -3});
    /// let err = v.field("age").read_where(|age: &i32| *age >= 0, "must not be negative");
    /// assert_eq!(err.unwrap_err().to_string(), "age: must not be negative");
    /// ```
    pub fn read_where<T, P>(&self, predicate: P, message: &str) -> FieldResult<T>
    where
        T: FromJson,
        P: FnOnce(&T) -> bool,
    {
        let value = self.read()?;
        if predicate(&value) {
            Ok(value)
        } else {
            Err(ValidationError::invalid(message).at(self.path.clone()).into())
        }
    }

    /// Reads the value as `T`, discarding the errors.
    pub fn to<T: FromJson>(&self) -> Option<T> {
        self.read().ok()
    }
}

/// Field access and codec entry points on `serde_json::Value`.
pub trait JsValueExt {
    /// Looks up `name` (see [`FieldRef::field`]).
    fn field(&self, name: &str) -> FieldRef<'_>;

    /// Looks up array element `index`.
    fn at(&self, index: usize) -> FieldRef<'_>;

    /// Reads the whole value as `T`.
    fn read<T: FromJson>(&self) -> FieldResult<T>;

    /// Reads the whole value with a codec.
    fn read_with<T, F: Format<T> + ?Sized>(&self, format: &F) -> FieldResult<T>;

    /// Whether the value reads successfully with `format`.
    fn validate<T, F: Format<T> + ?Sized>(&self, format: &F) -> bool;
}

impl JsValueExt for Value {
    fn field(&self, name: &str) -> FieldRef<'_> {
        FieldRef::root(self).field(name)
    }

    fn at(&self, index: usize) -> FieldRef<'_> {
        FieldRef::root(self).at(index)
    }

    fn read<T: FromJson>(&self) -> FieldResult<T> {
        T::from_json(self)
    }

    fn read_with<T, F: Format<T> + ?Sized>(&self, format: &F) -> FieldResult<T> {
        format.read(self)
    }

    fn validate<T, F: Format<T> + ?Sized>(&self, format: &F) -> bool {
        format.validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn missing_key_is_deferred() {
        let v = json!({"name": "John"});
        let f = v.field("surname");
        assert!(f.is_missing());
        assert_eq!(f.path().to_string(), "surname");
        let err = f.read::<String>().unwrap_err();
        assert_eq!(err.as_slice()[0].kind(), &ErrorKind::MissingField);
        assert_eq!(err.as_slice()[0].message(), "missing field");
    }

    #[test]
    fn non_object_yields_missing() {
        let v = json!("not an object");
        assert!(v.field("name").is_missing());
        assert!(json!([1]).field("0").is_missing());
    }

    #[test]
    fn chained_lookup_accumulates_path() {
        let v = json!({"address": {"street": "Baker Street"}, "tags": ["a", 7]});
        let street = v.field("address").field("street");
        assert_eq!(street.path().to_string(), "address.street");
        assert_eq!(street.to::<String>().as_deref(), Some("Baker Street"));

        let missing = v.field("nope").field("deeper");
        assert_eq!(missing.path().to_string(), "nope.deeper");
        assert!(missing.is_missing());

        let err = v.field("tags").at(1).read::<String>().unwrap_err();
        assert_eq!(err.paths(), ["tags[1]"]);
    }

    #[test]
    fn type_errors_are_attributed_to_field() {
        let v = json!({"age": "forty-two"});
        let err = v.field("age").read::<i32>().unwrap_err();
        assert_eq!(err.paths(), ["age"]);
    }

    #[test]
    fn nested_vec_errors_are_rerooted() {
        let v = json!({"scores": [1, "x"]});
        let err = v.field("scores").read::<Vec<u8>>().unwrap_err();
        assert_eq!(err.paths(), ["scores[1]"]);
    }

    #[test]
    fn read_opt_and_read_or() {
        let v = json!({"nick": null, "age": 42});
        assert_eq!(v.field("nick").read_opt::<String>().unwrap(), None);
        assert_eq!(v.field("absent").read_opt::<String>().unwrap(), None);
        assert_eq!(v.field("age").read_opt::<i32>().unwrap(), Some(42));
        assert!(v.field("age").read_opt::<String>().is_err());

        assert_eq!(v.field("absent").read_or(0i32).unwrap(), 0);
        assert_eq!(v.field("age").read_or(0i32).unwrap(), 42);
        assert!(v.field("nick").read_or(0i32).is_err());
    }

    #[test]
    fn read_where_reports_at_field() {
        let v = json!({"age": 17});
        let err = v
            .field("age")
            .read_where(|a: &u32| *a >= 18, "must be an adult")
            .unwrap_err();
        assert_eq!(err.as_slice()[0].path().to_string(), "age");
        assert_eq!(
            err.as_slice()[0].kind(),
            &ErrorKind::InvalidValue("must be an adult".into())
        );
        assert_eq!(v.field("age").read_where(|a: &u32| *a > 1, "x").unwrap(), 17);
    }

    #[test]
    fn root_read() {
        let v = json!(5);
        assert_eq!(v.read::<u8>().unwrap(), 5);
        assert!(v.read::<String>().unwrap_err().as_slice()[0].path().is_root());
    }
}
