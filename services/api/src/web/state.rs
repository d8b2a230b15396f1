//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use resume_assistant_core::ports::{ConversationLog, DocumentStore, SupervisorService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub conversation_log: Arc<dyn ConversationLog>,
    pub supervisor: Arc<dyn SupervisorService>,
    pub config: Arc<Config>,
}
