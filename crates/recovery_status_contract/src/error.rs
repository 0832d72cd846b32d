use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("unrecognized file status label: {0}")]
    UnknownLabel(String),
}

/// Structured error body returned to callers in place of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_type: String,
    pub http_status: u16,
    pub request_id: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(
        error_type: impl Into<String>,
        http_status: u16,
        request_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            http_status,
            request_id: request_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorBody;
    use serde_json::json;

    #[test]
    fn error_body_uses_camel_case_keys() {
        let body = ErrorBody::new("BadRequest", 400, "req-1", "granule_id must be set");
        assert_eq!(
            serde_json::to_value(&body).expect("serialize"),
            json!({
                "errorType": "BadRequest",
                "httpStatus": 400,
                "requestId": "req-1",
                "message": "granule_id must be set"
            })
        );
    }
}
