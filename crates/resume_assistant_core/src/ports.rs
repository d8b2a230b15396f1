//! crates/resume_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like file storage or
//! language-model APIs.

use crate::domain::Resume;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., disk, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Conversation Turns
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One role-tagged entry in a conversation's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists the names of every stored resume.
    async fn list_resumes(&self) -> PortResult<Vec<String>>;

    /// Loads one resume by name. Fails with `NotFound` when absent.
    async fn get_resume(&self, resume_name: &str) -> PortResult<Resume>;

    /// Persists one resume under the given name, overwriting any previous
    /// document of that name. Whole-document writes only; no merge.
    async fn save_resume(&self, resume: &Resume, resume_name: &str) -> PortResult<()>;
}

#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Appends one turn to a conversation, creating it on first use.
    async fn append(&self, conversation_id: &str, turn: ChatTurn) -> PortResult<()>;

    /// Reads a conversation's full history in append order. An unknown
    /// conversation id yields an empty history, not an error.
    async fn read_all(&self, conversation_id: &str) -> PortResult<Vec<ChatTurn>>;
}

/// The delegate content-editor agent, invoked by the supervisor.
///
/// Outcome text is the only channel back to the caller: tool-level failures
/// are folded into the returned string rather than raised, so the supervisor
/// can narrate them to the user.
#[async_trait]
pub trait ContentEditorService: Send + Sync {
    async fn handle_request(&self, request: &str, resume_name: Option<&str>) -> PortResult<String>;
}

/// The incremental reply produced by the supervisor for one user turn.
pub type ChatStream = Pin<Box<dyn Stream<Item = PortResult<String>> + Send>>;

/// The top-level conversational agent.
#[async_trait]
pub trait SupervisorService: Send + Sync {
    /// Produces the assistant's reply to the newest user turn as a stream of
    /// text chunks. `history` is the full prior conversation including that
    /// newest turn; `resume_name` is the currently selected resume, if any.
    async fn stream_chat(
        &self,
        history: Vec<ChatTurn>,
        resume_name: Option<String>,
    ) -> PortResult<ChatStream>;
}
