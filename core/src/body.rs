//! Decoded response bodies.
//!
//! The backend answers with either JSON or plain text. `ResponseBody` keeps
//! that distinction, and its accessors turn a JSON body into typed values.
//! Envelope fields such as `{"user": {...}}` are extracted by name and a
//! missing field is an error rather than a silent fallback to the whole body.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Decode a response according to its declared content type.
    pub fn decode(response: &HttpResponse) -> Result<Self, ApiError> {
        if response.is_json() {
            serde_json::from_str(&response.body)
                .map(ResponseBody::Json)
                .map_err(|e| ApiError::Deserialization {
                    status: Some(response.status),
                    message: e.to_string(),
                })
        } else {
            Ok(ResponseBody::Text(response.body.clone()))
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }

    /// The message a failed response carries, if any: a truthy `error` field
    /// of a JSON object, or a non-empty string body (JSON-encoded or text).
    pub(crate) fn error_message(&self) -> Option<String> {
        match self {
            ResponseBody::Json(Value::Object(map)) => match map.get("error") {
                None | Some(Value::Null) | Some(Value::Bool(false)) => None,
                Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
                Some(Value::String(s)) if s.is_empty() => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            },
            ResponseBody::Json(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) if text.is_empty() => None,
            ResponseBody::Text(text) => Some(text.clone()),
        }
    }

    /// Deserialize the whole JSON body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ResponseBody::Json(value) => from_value(value),
            ResponseBody::Text(_) => Err(ApiError::Deserialization {
                status: None,
                message: "expected a JSON response body, got text".to_string(),
            }),
        }
    }

    /// Extract and deserialize the top-level envelope field `name`.
    pub fn field<T: DeserializeOwned>(self, name: &str) -> Result<T, ApiError> {
        let missing = || ApiError::MissingField {
            field: name.to_string(),
        };
        match self {
            ResponseBody::Json(Value::Object(mut map)) => {
                let value = map.remove(name).ok_or_else(missing)?;
                from_value(value)
            }
            _ => Err(missing()),
        }
    }
}

/// Shape mismatches are found after the body left its response, so they carry
/// no status.
fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization {
        status: None,
        message: e.to_string(),
    })
}
