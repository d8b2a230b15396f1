//! services/api/src/web/chat.rs
//!
//! The conversational endpoint. One request carries one user turn; the reply
//! is flushed to the client incrementally as the supervisor produces it.
//!
//! The supervisor's stream is bridged to the HTTP body through a channel: a
//! producer task drains the model stream, forwarding each chunk downstream
//! and accumulating the full text, and appends the assistant turn to the
//! conversation log once the stream is exhausted. The user turn is appended
//! before the producer starts, so read-back order is always user first.

use crate::web::state::AppState;
use axum::{
    body::Body,
    extract::{Json, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use bytes::Bytes;
use futures::StreamExt;
use resume_assistant_core::ports::{ChatStream, ChatTurn, ConversationLog};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

//=========================================================================================
// Request Payload
//=========================================================================================

/// The payload for one conversational turn.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's free-text request.
    pub request: String,
    /// The conversation this turn belongs to; created implicitly on first use.
    pub conversation_id: String,
    /// The currently selected resume, if any.
    #[serde(default)]
    pub resume_name: Option<String>,
}

//=========================================================================================
// Chat Handler
//=========================================================================================

/// Post one user turn and stream back the assistant's reply.
///
/// Appends exactly one user turn before the reply starts and exactly one
/// assistant turn after the reply stream is exhausted.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's reply, flushed incrementally as plain text"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Json(chat_request): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    info!(
        "Chat turn received for conversation '{}'",
        chat_request.conversation_id
    );

    app_state
        .conversation_log
        .append(
            &chat_request.conversation_id,
            ChatTurn::user(chat_request.request.clone()),
        )
        .await
        .map_err(internal_error)?;

    let history = app_state
        .conversation_log
        .read_all(&chat_request.conversation_id)
        .await
        .map_err(internal_error)?;

    let reply_stream = app_state
        .supervisor
        .stream_chat(history, chat_request.resume_name.clone())
        .await
        .map_err(internal_error)?;

    let (tx, mut rx) = mpsc::channel::<Bytes>(32);
    tokio::spawn(pump_reply(
        reply_stream,
        tx,
        app_state.conversation_log.clone(),
        chat_request.conversation_id,
    ));

    let body = Body::from_stream(async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield Ok::<Bytes, std::convert::Infallible>(chunk);
        }
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    ))
}

fn internal_error(e: resume_assistant_core::ports::PortError) -> (StatusCode, String) {
    error!("Chat request failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to process chat request".to_string(),
    )
}

//=========================================================================================
// Producer Task
//=========================================================================================

/// Drains the supervisor's stream, forwarding chunks to the response channel.
///
/// The full text is accumulated here, not in the response path, so the
/// assistant turn is persisted even when the consumer disconnects mid-stream;
/// a truncated reply is persisted as-is and logged.
pub async fn pump_reply(
    mut reply_stream: ChatStream,
    tx: mpsc::Sender<Bytes>,
    conversation_log: Arc<dyn ConversationLog>,
    conversation_id: String,
) {
    let mut full_text = String::new();
    let mut truncated = false;

    while let Some(item) = reply_stream.next().await {
        match item {
            Ok(chunk) => {
                full_text.push_str(&chunk);
                if tx.send(Bytes::from(chunk.into_bytes())).await.is_err() {
                    // Consumer went away; keep what was produced so far.
                    truncated = true;
                    break;
                }
            }
            Err(e) => {
                error!(
                    "Supervisor stream for conversation '{}' failed: {}",
                    conversation_id, e
                );
                truncated = true;
                break;
            }
        }
    }

    if truncated {
        warn!(
            "Assistant turn for conversation '{}' was truncated; persisting partial text.",
            conversation_id
        );
    }

    if let Err(e) = conversation_log
        .append(&conversation_id, ChatTurn::assistant(full_text))
        .await
    {
        error!(
            "Failed to append assistant turn for conversation '{}': {}",
            conversation_id, e
        );
    }
}

//=========================================================================================
// Tests
//=========================================================================================
