//! Response dispatcher
//!
//! Runs one conversation turn: persist the user message, produce a reply
//! either from the rule engine (no credential) or the remote bridge, and
//! persist the reply. The mode is decided from scratch on every turn, so a
//! key supplied mid-conversation takes effect on the next message.
//!
//! Turns run one at a time. A reply whose log was cleared or replaced by an
//! import while it was being produced is dropped instead of persisted.

#[cfg(test)]
pub mod testing;

use crate::db::{Database, DbResult, Message, Role, TurnStart};
use crate::llm::{Credential, CredentialResolver, RemoteBridge, RemoteErrorKind};
use crate::persona::{self, QuickAction, DEMO_NOTICE};
use crate::rules::RuleEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Which generator produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Local rule engine, no credential available
    Demo,
    /// Remote chat model
    Live,
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Suffix demo replies with the demo notice
    pub disclose_demo: bool,
    /// Pause before a demo reply
    pub demo_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            disclose_demo: true,
            demo_delay: Duration::ZERO,
        }
    }
}

/// Result of one completed turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub mode: Mode,
    pub user: Message,
    /// `None` when the log was cleared or replaced before the reply landed
    pub reply: Option<Message>,
    /// Set when the remote model failed and the reply is an apology
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<RemoteErrorKind>,
}

pub struct Dispatcher {
    db: Database,
    rules: RuleEngine,
    bridge: Arc<dyn RemoteBridge>,
    credentials: CredentialResolver,
    rng: Mutex<StdRng>,
    config: DispatchConfig,
    /// Held for a whole turn so turns never interleave
    turn: tokio::sync::Mutex<()>,
}

impl Dispatcher {
    pub fn new(
        db: Database,
        bridge: Arc<dyn RemoteBridge>,
        credentials: CredentialResolver,
        config: DispatchConfig,
    ) -> Self {
        Self {
            db,
            rules: RuleEngine::default(),
            bridge,
            credentials,
            rng: Mutex::new(StdRng::from_entropy()),
            config,
            turn: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the random source with a seeded one
    #[cfg(test)]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Mode the next turn would run in
    pub fn mode(&self) -> Mode {
        if self.credentials.resolve().is_some() {
            Mode::Live
        } else {
            Mode::Demo
        }
    }

    pub fn model_id(&self) -> &str {
        self.bridge.model_id()
    }

    /// Run one turn for `text`.
    ///
    /// Remote failures are answered in persona and never surface as errors;
    /// only storage faults do.
    pub async fn submit(&self, text: &str) -> DbResult<TurnOutcome> {
        let _turn = self.turn.lock().await;

        // Seeds the welcome line on an empty log so it precedes the user turn
        let TurnStart {
            prior,
            user,
            generation,
        } = self.db.begin_turn(text)?;

        let (mode, reply_text, remote_error) = match self.credentials.resolve() {
            Some((credential, source)) => {
                tracing::debug!(source, "Dispatching turn to remote bridge");
                let (reply, error) = self.live_reply(&credential, &prior, text).await;
                (Mode::Live, reply, error)
            }
            None => (Mode::Demo, self.demo_reply(text).await, None),
        };

        let reply = self
            .db
            .append_in_generation(Role::Assistant, &reply_text, generation)?;
        match &reply {
            Some(reply) => tracing::info!(
                mode = ?mode,
                user_seq = user.sequence,
                reply_seq = reply.sequence,
                remote_error = ?remote_error,
                "Turn completed"
            ),
            None => tracing::warn!(
                mode = ?mode,
                user_seq = user.sequence,
                turn_generation = generation,
                current_generation = self.db.generation(),
                "Log replaced during turn, reply dropped"
            ),
        }

        Ok(TurnOutcome {
            mode,
            user,
            reply,
            remote_error,
        })
    }

    /// Submit the canned text of a quick action
    pub async fn quick_action(&self, action: QuickAction) -> DbResult<TurnOutcome> {
        self.submit(action.text()).await
    }

    async fn demo_reply(&self, text: &str) -> String {
        if !self.config.demo_delay.is_zero() {
            tokio::time::sleep(self.config.demo_delay).await;
        }

        let category = self.rules.category_of(text);
        let mut reply = self.rules.classify(text, &mut *self.rng());
        tracing::debug!(category = ?category, "Rule engine reply");

        if self.config.disclose_demo {
            reply.push_str(DEMO_NOTICE);
        }
        reply
    }

    async fn live_reply(
        &self,
        credential: &Credential,
        prior: &[Message],
        text: &str,
    ) -> (String, Option<RemoteErrorKind>) {
        let turns = self.bridge.translate_history(prior);

        match self.bridge.send(credential, &turns, text).await {
            Ok(reply) => (reply, None),
            Err(e) => {
                tracing::warn!(
                    kind = ?e.kind,
                    error = %e.message,
                    "Remote bridge failed, answering with an apology"
                );
                let pick = self.rng().gen_range(0..persona::apology_lines().len());
                (persona::apology(e.kind.tag(), pick), Some(e.kind))
            }
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
