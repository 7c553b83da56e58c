//! Mock remote bridge for dispatcher tests

use crate::llm::{Credential, ProviderTurn, RemoteBridge, RemoteError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One recorded `send` call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub credential: String,
    pub history: Vec<ProviderTurn>,
    pub new_input: String,
}

/// Mock bridge that returns queued replies
pub struct MockBridge {
    replies: Mutex<VecDeque<Result<String, RemoteError>>>,
    model_id: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBridge {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue an error reply
    pub fn queue_error(&self, error: RemoteError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteBridge for MockBridge {
    async fn send(
        &self,
        credential: &Credential,
        history: &[ProviderTurn],
        new_input: &str,
    ) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(RecordedCall {
            credential: credential.expose().to_string(),
            history: history.to_vec(),
            new_input: new_input.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::network("No mock reply queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Mock bridge that parks every request until released (for interleaving tests)
pub struct GatedMockBridge {
    inner: MockBridge,
    /// Notified when a request reaches the bridge
    pub request_started: Arc<Notify>,
    /// Notify once per request to let it finish
    pub release: Arc<Notify>,
}

impl GatedMockBridge {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            inner: MockBridge::new(model_id),
            request_started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.inner.queue_reply(text);
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.inner.recorded_calls()
    }
}

#[async_trait]
impl RemoteBridge for GatedMockBridge {
    async fn send(
        &self,
        credential: &Credential,
        history: &[ProviderTurn],
        new_input: &str,
    ) -> Result<String, RemoteError> {
        self.request_started.notify_one();
        self.release.notified().await;
        self.inner.send(credential, history, new_input).await
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
