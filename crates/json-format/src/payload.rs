//! The boundary with an HTTP layer: request bodies in, JSON bodies out.
//!
//! Nothing here knows about routing or sockets; a server hands over raw body
//! bytes and receives ready-to-send text with its content type.

use serde_json::Value;
use thiserror::Error;

use crate::error::ValidationErrors;
use crate::format::Format;
use crate::value::obj;

/// Content type of every body produced here.
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("malformed JSON payload: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("invalid payload: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl PayloadError {
    /// The validation errors, if the payload parsed but did not validate.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PayloadError::Invalid(errors) => Some(errors),
            PayloadError::Syntax(_) => None,
        }
    }
}

/// Parses a UTF-8 JSON body.
pub fn parse(body: &[u8]) -> Result<Value, PayloadError> {
    Ok(serde_json::from_slice(body)?)
}

pub fn parse_str(body: &str) -> Result<Value, PayloadError> {
    Ok(serde_json::from_str(body)?)
}

/// Compact JSON text; object keys keep their insertion order.
pub fn stringify(value: &Value) -> String {
    value.to_string()
}

/// Parses `body` and reads it with `format`.
pub fn decode<T, F>(body: &[u8], format: &F) -> Result<T, PayloadError>
where
    F: Format<T> + ?Sized,
{
    let value = parse(body)?;
    tracing::trace!(payload = %value, "decoding payload");
    format.read(&value).map_err(|errors| {
        tracing::debug!(errors = errors.len(), "payload failed validation");
        PayloadError::Invalid(errors)
    })
}

/// Renders errors as `[{"field": "...", "message": "..."}, ...]`.
pub fn error_report(errors: &ValidationErrors) -> Value {
    Value::Array(
        errors
            .iter()
            .map(|e| {
                obj([
                    ("field", Value::String(e.path().to_string())),
                    ("message", Value::String(e.message().to_string())),
                ])
            })
            .collect(),
    )
}

/// A response body ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody {
    pub content_type: &'static str,
    pub body: String,
}

impl JsonBody {
    pub fn from_value(value: &Value) -> Self {
        JsonBody {
            content_type: APPLICATION_JSON,
            body: stringify(value),
        }
    }

    /// Writes `value` with `format` and stringifies the result.
    pub fn encode<T, F: Format<T> + ?Sized>(value: &T, format: &F) -> Self {
        Self::from_value(&format.write(value))
    }

    /// The [`error_report`] of `errors`.
    pub fn errors(errors: &ValidationErrors) -> Self {
        Self::from_value(&error_report(errors))
    }
}
