//! Combinators merging independent field results.
//!
//! Unlike `?`, combining never stops at the first failure: every failed
//! input contributes its errors, in argument order.

use crate::error::{FieldResult, ValidationErrors};

/// A tuple of field results that can be merged into one result over a tuple.
pub trait Combine {
    type Output;

    fn combine(self) -> FieldResult<Self::Output>;
}

/// Merges a tuple of field results.
///
/// # Example
///
/// ```
/// use json_format::{combine, JsValueExt};
/// use serde_json::json;
///
/// let v = json!({"name": "John", "age": "forty-two"});
/// let err = combine((
///     v.field("name").read::<String>(),
///     v.field("surname").read::<String>(),
///     v.field("age").read::<i32>(),
/// ))
/// .unwrap_err();
/// assert_eq!(err.paths(), ["surname", "age"]);
/// ```
pub fn combine<C: Combine>(results: C) -> FieldResult<C::Output> {
    results.combine()
}

/// Merges a homogeneous sequence of field results, keeping every error.
pub fn combine_all<T, I>(results: I) -> FieldResult<Vec<T>>
where
    I: IntoIterator<Item = FieldResult<T>>,
{
    let mut values = Vec::new();
    let mut errors: Option<ValidationErrors> = None;
    for result in results {
        match result {
            Ok(v) => values.push(v),
            Err(e) => match errors.as_mut() {
                Some(acc) => acc.merge(e),
                None => errors = Some(e),
            },
        }
    }
    match errors {
        Some(errors) => Err(errors),
        None => Ok(values),
    }
}

macro_rules! impl_combine {
    ($($name:ident : $ty:ident),+) => {
        impl<$($ty),+> Combine for ($(FieldResult<$ty>,)+) {
            type Output = ($($ty,)+);

            fn combine(self) -> FieldResult<Self::Output> {
                match self {
                    ($(Ok($name),)+) => Ok(($($name,)+)),
                    ($($name,)+) => {
                        let mut errors = Vec::new();
                        $(
                            if let Err(errs) = $name {
                                errors.extend(errs);
                            }
                        )+
                        Err(ValidationErrors::from_nonempty(errors))
                    }
                }
            }
        }
    };
}

impl_combine!(a: A);
impl_combine!(a: A, b: B);
impl_combine!(a: A, b: B, c: C);
impl_combine!(a: A, b: B, c: C, d: D);
impl_combine!(a: A, b: B, c: C, d: D, e: E);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K);
impl_combine!(a: A, b: B, c: C, d: D, e: E, f: F, g: G, h: H, i: I, j: J, k: K, l: L);
