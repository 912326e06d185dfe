//! Typed readers: JSON value to Rust value, failures returned as data.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

use crate::combine::combine_all;
use crate::error::{FieldPath, FieldResult, ValidationError, ValidationErrors};
use crate::value::{kind_of, JsonKind};

/// Types that can be read directly from a JSON value.
///
/// Errors are reported relative to `value`; callers re-root them under the
/// field they read from.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> FieldResult<Self>;
}

fn mismatch(expected: JsonKind, value: &Value) -> ValidationErrors {
    ValidationError::type_mismatch(expected, kind_of(value)).into()
}

impl FromJson for String {
    fn from_json(value: &Value) -> FieldResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(JsonKind::String, other)),
        }
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> FieldResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(JsonKind::Bool, other)),
        }
    }
}

fn precision_loss(n: impl std::fmt::Display, ty: &str) -> ValidationErrors {
    ValidationError::invalid(format!(
        "{} is not representable as {} without precision loss",
        n, ty
    ))
    .into()
}

impl FromJson for f64 {
    fn from_json(value: &Value) -> FieldResult<Self> {
        let n = match value {
            Value::Number(n) => n,
            other => return Err(mismatch(JsonKind::Number, other)),
        };
        // Integers above 2^53 may not survive the conversion.
        let exact = match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Some(i as i128),
            (None, Some(u)) => Some(u as i128),
            (None, None) => None,
        };
        let f = n
            .as_f64()
            .ok_or_else(|| ValidationError::invalid(format!("{} is not representable", n)))?;
        match exact {
            Some(i) if f as i128 != i => Err(precision_loss(n, "f64")),
            _ => Ok(f),
        }
    }
}

impl FromJson for f32 {
    fn from_json(value: &Value) -> FieldResult<Self> {
        let n = f64::from_json(value)?;
        if n.abs() > f32::MAX as f64 {
            return Err(ValidationError::invalid(format!("{} is out of range for f32", n)).into());
        }
        // Fractions are rounded to the nearest f32; integers must stay exact.
        if n.fract() == 0.0 && (n as f32) as f64 != n {
            return Err(precision_loss(n, "f32"));
        }
        Ok(n as f32)
    }
}

impl FromJson for Value {
    fn from_json(value: &Value) -> FieldResult<Self> {
        Ok(value.clone())
    }
}

// 2^63 and 2^64 are exact in f64; every integral f64 in between fits i128.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const U64_END_F: f64 = 18_446_744_073_709_551_616.0;

/// Reads an integral number without losing precision.
fn integer(value: &Value) -> FieldResult<i128> {
    let n: &Number = match value {
        Value::Number(n) => n,
        other => return Err(mismatch(JsonKind::Integer, other)),
    };
    if let Some(i) = n.as_i64() {
        return Ok(i as i128);
    }
    if let Some(u) = n.as_u64() {
        return Ok(u as i128);
    }
    match n.as_f64() {
        Some(f) if f.fract() != 0.0 => Err(mismatch(JsonKind::Integer, value)),
        Some(f) if (I64_MIN_F..U64_END_F).contains(&f) => Ok(f as i128),
        _ => Err(ValidationError::invalid(format!("{} is out of range", n)).into()),
    }
}

macro_rules! impl_from_json_int {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromJson for $ty {
                fn from_json(value: &Value) -> FieldResult<Self> {
                    let n = integer(value)?;
                    <$ty>::try_from(n).map_err(|_| {
                        ValidationError::invalid(format!(
                            "{} is out of range for {}",
                            n,
                            stringify!($ty)
                        ))
                        .into()
                    })
                }
            }
        )+
    };
}

impl_from_json_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// `null` reads as `None`; anything else must read as `T`.
impl<T: FromJson> FromJson for Option<T> {
    fn from_json(value: &Value) -> FieldResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_json(other).map(Some),
        }
    }
}

/// Every element is read; errors from all elements are reported under
/// their index.
impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> FieldResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch(JsonKind::Array, other)),
        };
        combine_all(items.iter().enumerate().map(|(i, item)| {
            T::from_json(item).map_err(|e| e.rerooted(&FieldPath::root().child(i)))
        }))
    }
}

impl<T: FromJson> FromJson for BTreeMap<String, T> {
    fn from_json(value: &Value) -> FieldResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(mismatch(JsonKind::Object, other)),
        };
        let entries = combine_all(map.iter().map(|(key, item)| {
            T::from_json(item)
                .map(|v| (key.clone(), v))
                .map_err(|e| e.rerooted(&FieldPath::root().child(key.as_str())))
        }))?;
        Ok(entries.into_iter().collect())
    }
}
