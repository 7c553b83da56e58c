//! HTTP API for Susana
//!
//! Turn submission, quick actions, history, reset, snapshot
//! download/upload, session credential, and status.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::db::Database;
use crate::dispatcher::Dispatcher;
use crate::llm::SessionCredential;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub dispatcher: Arc<Dispatcher>,
    /// Runtime-supplied credential tier, also registered with the dispatcher
    pub session: Arc<SessionCredential>,
}

impl AppState {
    pub fn new(db: Database, dispatcher: Arc<Dispatcher>, session: Arc<SessionCredential>) -> Self {
        Self {
            db,
            dispatcher,
            session,
        }
    }
}
