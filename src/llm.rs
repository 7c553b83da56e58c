//! Remote chat bridge
//!
//! Translates the stored conversation into the turn format a remote chat
//! model expects and maps its reply back to plain text.

mod credential;
mod error;
mod gemini;

#[cfg(test)]
mod proptests;

pub use credential::{Credential, CredentialResolver, SessionCredential, StaticCredential};
pub use error::{RemoteError, RemoteErrorKind};
pub use gemini::GeminiBridge;

use crate::db::{Message, Role};
use crate::persona::is_system_notice;
use async_trait::async_trait;
use std::sync::Arc;

/// Speaker of a provider-side turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRole {
    User,
    Model,
}

/// One turn as the remote model sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTurn {
    pub role: ProviderRole,
    pub text: String,
}

impl ProviderTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ProviderRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ProviderRole::Model,
            text: text.into(),
        }
    }
}

/// Map stored messages to provider turns, in order, skipping system notices
pub fn translate_history(messages: &[Message]) -> Vec<ProviderTurn> {
    messages
        .iter()
        .filter(|msg| !is_system_notice(&msg.content))
        .map(|msg| match msg.role {
            Role::User => ProviderTurn::user(msg.content.as_str()),
            Role::Assistant => ProviderTurn::model(msg.content.as_str()),
        })
        .collect()
}

/// A remote chat capability
#[async_trait]
pub trait RemoteBridge: Send + Sync {
    /// Prepare stored history for `send`
    fn translate_history(&self, messages: &[Message]) -> Vec<ProviderTurn> {
        translate_history(messages)
    }

    /// One request, no retry. Returns the generated text.
    async fn send(
        &self,
        credential: &Credential,
        history: &[ProviderTurn],
        new_input: &str,
    ) -> Result<String, RemoteError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for remote bridges
pub struct LoggingBridge {
    inner: Arc<dyn RemoteBridge>,
    model_id: String,
}

impl LoggingBridge {
    pub fn new(inner: Arc<dyn RemoteBridge>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl RemoteBridge for LoggingBridge {
    fn translate_history(&self, messages: &[Message]) -> Vec<ProviderTurn> {
        self.inner.translate_history(messages)
    }

    async fn send(
        &self,
        credential: &Credential,
        history: &[ProviderTurn],
        new_input: &str,
    ) -> Result<String, RemoteError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(credential, history, new_input).await;
        let duration = start.elapsed();

        match &result {
            Ok(text) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    history_turns = history.len(),
                    reply_chars = text.chars().count(),
                    "Remote reply received"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Remote request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
