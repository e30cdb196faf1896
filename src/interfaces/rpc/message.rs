use crate::error::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error URI for lines that are not a valid call.
pub const PROTOCOL_VIOLATION: &str = "wamp.error.protocol_violation";

/// A message sent by a caller, one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Call {
        request: u64,
        procedure: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// A reply sent back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Result {
        request: u64,
        value: Value,
    },
    Error {
        /// `None` when the offending line could not be parsed far enough to
        /// recover its request id.
        request: Option<u64>,
        error: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn from_error(request: u64, err: &RpcError) -> Self {
        Self::Error {
            request: Some(request),
            error: err.uri().to_string(),
            message: err.to_string(),
        }
    }

    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::Error {
            request: None,
            error: PROTOCOL_VIOLATION.to_string(),
            message: message.into(),
        }
    }
}
