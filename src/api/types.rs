//! API request and response types

use crate::db::Message;
use crate::dispatcher::Mode;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Request to store a session credential
#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

/// Response with the conversation log
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
    pub generation: u64,
}

/// Quick action description
#[derive(Debug, Serialize)]
pub struct ActionInfo {
    pub slug: &'static str,
    pub label: &'static str,
    pub text: &'static str,
}

/// Response for action list
#[derive(Debug, Serialize)]
pub struct ActionsResponse {
    pub actions: Vec<ActionInfo>,
}

/// Response for reset
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub generation: u64,
}

/// Response for a successful snapshot import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub restored: usize,
    pub generation: u64,
}

/// Response for credential actions
#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub mode: Mode,
}

/// Response for status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub mode: Mode,
    pub model: String,
    pub message_count: usize,
    pub generation: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
