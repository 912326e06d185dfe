//! Validation errors and the paths they are reported at.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::value::JsonKind;

/// Outcome of reading a field or an entity.
///
/// `Err` always carries at least one [`ValidationError`].
pub type FieldResult<T> = Result<T, ValidationErrors>;

// ── Paths ──────────────────────────────────────────────────────────────────

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Location of a value relative to the root entity being decoded.
///
/// Displays dotted (`address.street`, `items[2].name`); the root path
/// displays as the empty string. A key that is empty or contains `.`, `[`,
/// `]` or `"` displays as a quoted subscript (`["a.b"]`) so it cannot be
/// confused with a nested path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        FieldPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment.into());
        FieldPath(segments)
    }

    /// Prepends `prefix` to this path.
    pub fn reroot(&mut self, prefix: &FieldPath) {
        if prefix.is_root() {
            return;
        }
        let mut segments = Vec::with_capacity(prefix.0.len() + self.0.len());
        segments.extend_from_slice(&prefix.0);
        segments.append(&mut self.0);
        self.0 = segments;
    }

    /// Renders the path as an RFC 6901 JSON Pointer.
    ///
    /// ```
    /// use json_format::FieldPath;
    ///
    /// let path = FieldPath::from_iter(["a/b", "c~d"]).child(0usize);
    /// assert_eq!(path.to_pointer(), "/a~1b/c~0d/0");
    /// assert_eq!(FieldPath::root().to_pointer(), "");
    /// ```
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            out.push('/');
            match segment {
                PathSegment::Key(key) => {
                    // ~ must be escaped before /
                    out.push_str(&key.replace('~', "~0").replace('/', "~1"));
                }
                PathSegment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FieldPath(iter.into_iter().map(Into::into).collect())
    }
}

impl From<PathSegment> for FieldPath {
    fn from(segment: PathSegment) -> Self {
        FieldPath(vec![segment])
    }
}

impl From<&str> for FieldPath {
    fn from(key: &str) -> Self {
        FieldPath(vec![PathSegment::from(key)])
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => {
                    write!(f, "[{}]", Value::from(key.as_str()))?
                }
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Errors ─────────────────────────────────────────────────────────────────

/// Why a value was rejected.
///
/// A nested entity's failures are not wrapped in a separate kind: they keep
/// their leaf kind and get their path re-rooted under the enclosing field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("missing field")]
    MissingField,

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: JsonKind, found: JsonKind },

    #[error("{0}")]
    InvalidValue(String),

    #[error("unknown field")]
    UnknownField,
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::TypeMismatch { .. } => "type_mismatch",
            ErrorKind::InvalidValue(_) => "invalid_value",
            ErrorKind::UnknownField => "unknown_field",
        }
    }
}

/// A single rejected value and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    path: FieldPath,
    kind: ErrorKind,
    message: String,
}

impl ValidationError {
    /// Creates an error at the root path; the message is the kind's text.
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        ValidationError {
            path: FieldPath::root(),
            kind,
            message,
        }
    }

    pub fn missing_field() -> Self {
        Self::new(ErrorKind::MissingField)
    }

    pub fn type_mismatch(expected: JsonKind, found: JsonKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, found })
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue(message.into()))
    }

    pub fn unknown_field() -> Self {
        Self::new(ErrorKind::UnknownField)
    }

    /// Moves the error to `path`.
    pub fn at(mut self, path: impl Into<FieldPath>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of path segments; greater than one for nested failures.
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationError", 4)?;
        s.serialize_field("field", &self.path)?;
        s.serialize_field("pointer", &self.path.to_pointer())?;
        s.serialize_field("code", self.kind.code())?;
        s.serialize_field("message", &self.message)?;
        s.end()
    }
}

/// Every error collected while reading one value, in reporting order.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{}", render(.0))]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Wraps a list of errors; `None` if the list is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(ValidationErrors(errors))
        }
    }

    /// Caller guarantees `errors` is non-empty.
    pub(crate) fn from_nonempty(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        ValidationErrors(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Appends `other`'s errors after this one's.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Prefixes every error path with `prefix`.
    pub fn rerooted(mut self, prefix: &FieldPath) -> Self {
        for error in &mut self.0 {
            error.path.reroot(prefix);
        }
        self
    }

    /// Errors whose path starts with `segment`.
    pub fn nested_under<'a>(
        &'a self,
        segment: &'a PathSegment,
    ) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.0
            .iter()
            .filter(move |e| e.path.segments().first() == Some(segment))
    }

    /// Dotted paths of every error, in order.
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(|e| e.path.to_string()).collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
