use serde::{Serialize, Serializer, ser::SerializeStruct};
use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ApiClient::fetch`](crate::ApiClient::fetch)
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a status outside `[200, 300)`
    #[error("{message}")]
    Response {
        status: u16,
        message: String,
        /// Decoded response body, `Value::Null` if it was not valid JSON
        detail: Value,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Custom method is not a valid HTTP token
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// `fetch` was called before `build_request`
    #[error("Request was fetched before it was built")]
    NotBuilt,
}

impl ApiError {
    /// Build the error returned for a non-2xx status code
    pub fn response(status: u16, detail: Value) -> Self {
        Self::Response {
            status,
            message: format!("Status: {status}"),
            detail,
        }
    }

    /// Stable machine-readable kind, e.g. `response-error`
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Response { .. } => "response-error",
            ApiError::Http(_) => "http-error",
            ApiError::InvalidHeader(_) => "invalid-header",
            ApiError::InvalidMethod(_) => "invalid-method",
            ApiError::NotBuilt => "not-built",
        }
    }

    /// HTTP status of a response error
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Decoded body carried by a response error
    pub fn detail(&self) -> Option<&Value> {
        match self {
            ApiError::Response { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ApiError::Response {
                status,
                message,
                detail,
            } => {
                let mut state = serializer.serialize_struct("ApiError", 4)?;
                state.serialize_field("type", self.kind())?;
                state.serialize_field("status", status)?;
                state.serialize_field("message", message)?;
                state.serialize_field("detail", detail)?;
                state.end()
            }
            ApiError::NotBuilt => {
                let mut state = serializer.serialize_struct("ApiError", 1)?;
                state.serialize_field("type", self.kind())?;
                state.end()
            }
            ApiError::Http(_) | ApiError::InvalidHeader(_) | ApiError::InvalidMethod(_) => {
                let mut state = serializer.serialize_struct("ApiError", 2)?;
                state.serialize_field("type", self.kind())?;
                state.serialize_field("message", &self.to_string())?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_error_message_contains_status() {
        let err = ApiError::response(404, json!({"Message": "not found"}));
        assert_eq!(err.kind(), "response-error");
        assert!(err.to_string().contains("404"));
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.detail(), Some(&json!({"Message": "not found"})));
    }

    #[test]
    fn test_response_error_serialization() {
        let err = ApiError::response(422, Value::Null);
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "response-error",
                "status": 422,
                "message": "Status: 422",
                "detail": null
            })
        );
    }

    #[test]
    fn test_other_errors_serialize_kind_and_message() {
        let value = serde_json::to_value(ApiError::InvalidHeader("bad\nname".into())).unwrap();
        assert_eq!(value["type"], "invalid-header");
        assert!(value["message"].as_str().unwrap().contains("bad"));

        let value = serde_json::to_value(ApiError::NotBuilt).unwrap();
        assert_eq!(value, json!({"type": "not-built"}));
    }
}
