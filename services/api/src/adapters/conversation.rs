//! services/api/src/adapters/conversation.rs
//!
//! This module contains the in-memory conversation log adapter, the concrete
//! implementation of the `ConversationLog` port from the `core` crate.

use async_trait::async_trait;
use resume_assistant_core::ports::{ChatTurn, ConversationLog, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory, process-lifetime conversation log.
///
/// Each conversation id is an independent append-only sequence; there is no
/// ordering relationship across conversations.
#[derive(Default)]
pub struct InMemoryConversationLog {
    storage: RwLock<HashMap<String, Vec<ChatTurn>>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

//=========================================================================================
// `ConversationLog` Trait Implementation
//=========================================================================================

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, conversation_id: &str, turn: ChatTurn) -> PortResult<()> {
        let mut storage = self.storage.write().await;
        storage
            .entry(conversation_id.to_string())
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn read_all(&self, conversation_id: &str) -> PortResult<Vec<ChatTurn>> {
        let storage = self.storage.read().await;
        Ok(storage.get(conversation_id).cloned().unwrap_or_default())
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use resume_assistant_core::ports::ChatRole;

    #[tokio::test]
    async fn unknown_conversation_reads_back_empty() {
        let log = InMemoryConversationLog::new();
        assert!(log.read_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_preserve_order_per_conversation() {
        let log = InMemoryConversationLog::new();
        log.append("c1", ChatTurn::user("first")).await.unwrap();
        log.append("c1", ChatTurn::assistant("second")).await.unwrap();
        log.append("c2", ChatTurn::user("other")).await.unwrap();

        let turns = log.read_all("c1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].content, "first");
        assert_eq!(turns[1].role, ChatRole::Assistant);
        assert_eq!(turns[1].content, "second");
        assert_eq!(log.read_all("c2").await.unwrap().len(), 1);
    }
}
