//! Response envelope and request error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result of a request operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseResult {
    /// Operation succeeded
    Success {
        /// Optional data payload (varies by request type)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// Operation failed
    Error {
        /// Error classification code
        code: ErrorCode,
        /// Human-readable error message
        message: String,
    },
    /// Unknown response type for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ResponseResult {
    pub fn success_empty() -> Self {
        ResponseResult::Success { data: None }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ResponseResult::Error {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success { .. })
    }

    /// Convert into a `Result`, mapping error envelopes to `RequestError`
    pub fn into_result(self) -> Result<Option<serde_json::Value>, RequestError> {
        match self {
            ResponseResult::Success { data } => Ok(data),
            ResponseResult::Error { code, message } => {
                Err(RequestError::Rejected { code, message })
            }
            ResponseResult::Unknown => Err(RequestError::Rejected {
                code: ErrorCode::Unknown,
                message: "unrecognized response".to_string(),
            }),
        }
    }
}

/// Error classification codes from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "BOARD_FULL")]
    BoardFull,
    #[serde(rename = "ILLEGAL_ACTION")]
    IllegalAction,
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    #[serde(rename = "INTERNAL")]
    Internal,
    #[serde(other)]
    Unknown,
}

/// Errors surfaced by the request layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request failed to send: {0}")]
    SendFailed(String),
    #[error("request timed out")]
    Timeout,
    #[error("request rejected: {message}")]
    Rejected { code: ErrorCode, message: String },
    #[error("request cancelled")]
    Cancelled,
}

impl RequestError {
    /// The structural board-full rejection that re-routes into the
    /// slot-replacement dialog. Older engines report it only through the
    /// message text, so both forms are recognized.
    pub fn is_board_full(&self) -> bool {
        match self {
            RequestError::Rejected { code, message } => {
                *code == ErrorCode::BoardFull || message.contains("choose a slot to replace")
            }
            _ => false,
        }
    }

    /// Message to surface verbatim in the generic error dialog
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_parses() {
        let json = r#"{"status": "error", "code": "BOARD_FULL", "message": "choose a slot to replace"}"#;
        let result: ResponseResult = serde_json::from_str(json).unwrap();
        let err = result.into_result().unwrap_err();
        assert!(err.is_board_full());
    }

    #[test]
    fn message_only_board_full_is_recognized() {
        let err = RequestError::Rejected {
            code: ErrorCode::Unknown,
            message: "battle area occupied: choose a slot to replace".to_string(),
        };
        assert!(err.is_board_full());
    }

    #[test]
    fn unknown_status_maps_to_rejected() {
        let json = r#"{"status": "teapot"}"#;
        let result: ResponseResult = serde_json::from_str(json).unwrap();
        assert!(result.into_result().is_err());
    }
}
