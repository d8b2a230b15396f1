//! services/api/src/adapters/supervisor_llm.rs
//!
//! This module contains the adapter for the top-level supervisor agent.
//! It implements the `SupervisorService` port from the `core` crate.
//!
//! The supervisor replays the conversation history into the model, forwards
//! every content token downstream as soon as it arrives, and collects
//! tool-call deltas on the side. A streaming round that ends with pending
//! tool calls pauses the outer reply: the calls are dispatched (delegation to
//! the content editor, or the resume listing), their outputs are folded back
//! into the transcript, and a new streaming round begins. The reply is done
//! when a round finishes without tool calls.

const SUPERVISOR_AGENT_PROMPT: &str = "You are a resume assistant supervisor, an advanced AI \
assistant designed to help users with all aspects of resume creation and improvement. You have \
access to specialized tools to assist with this process; delegate to them as needed to provide \
the best possible assistance to the user. When delegating tasks, provide clear instructions and \
context: do not assume that a tool has prior knowledge of the user's requests or history. \
The user can select a resume and once they do it'll be available in the context. \
Always assume that the user has a resume; if no resume is selected your tools will alert you, \
and in this case ask the user to create a resume. \
This process should be transparent to the user; always communicate with the user directly.";

use crate::adapters::editor_llm::NO_RESUME_SELECTED;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCallChunk,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolArgs,
        ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use resume_assistant_core::ports::{
    ChatRole, ChatStream, ChatTurn, ContentEditorService, DocumentStore, PortError, PortResult,
    SupervisorService,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

//=========================================================================================
// Tool-Call Accumulation
//=========================================================================================

/// One tool invocation assembled from streaming deltas.
///
/// The id and name arrive on the call's first delta; the argument JSON is
/// spread over subsequent deltas and concatenated here.
#[derive(Debug, Default, Clone)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

fn merge_tool_call_chunks(
    pending: &mut Vec<PendingToolCall>,
    deltas: Vec<ChatCompletionMessageToolCallChunk>,
) {
    for delta in deltas {
        let index = delta.index as usize;
        while pending.len() <= index {
            pending.push(PendingToolCall::default());
        }
        let slot = &mut pending[index];
        if let Some(id) = delta.id {
            slot.id = id;
        }
        if let Some(function) = delta.function {
            if let Some(name) = function.name {
                slot.name.push_str(&name);
            }
            if let Some(arguments) = function.arguments {
                slot.arguments.push_str(&arguments);
            }
        }
    }
}

#[derive(Deserialize)]
struct ResumeContentEditorArgs {
    request: String,
}

fn supervisor_tool_definitions() -> PortResult<Vec<ChatCompletionTool>> {
    let editor = ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name("resume_content_editor")
                .description(
                    "Resume content editor specialist to help users improve their resume content. \
                     Example requests this tool can help with: analyzing and improving existing \
                     resume content, suggesting new sections or bullet points, tailoring content \
                     for specific job descriptions, and providing feedback on clarity and impact. \
                     Its output can be a confirmation, a question back to the user, etc.",
                )
                .parameters(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "request": {
                            "type": "string",
                            "description": "The full task for the editor, restated with all \
                                            context it needs; it shares none of this conversation.",
                        },
                    },
                    "required": ["request"],
                }))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        )
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    let list = ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name("list_resumes")
                .description("Lists all resumes available in the system, one name per line.")
                .parameters(serde_json::json!({
                    "type": "object",
                    "properties": {},
                }))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        )
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    Ok(vec![editor, list])
}

/// Rebuilds the assistant turn that requested the pending tool calls, so the
/// next round's transcript matches what the model actually produced.
fn assistant_turn_with_tool_calls(
    round_text: &str,
    pending: &[PendingToolCall],
) -> PortResult<ChatCompletionRequestMessage> {
    let tool_calls: Vec<ChatCompletionMessageToolCall> = pending
        .iter()
        .map(|call| ChatCompletionMessageToolCall {
            id: call.id.clone(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
        .collect();

    let mut assistant = ChatCompletionRequestAssistantMessageArgs::default();
    assistant.tool_calls(tool_calls);
    if !round_text.is_empty() {
        assistant.content(round_text.to_string());
    }
    Ok(assistant
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .into())
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SupervisorService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSupervisorAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    editor: Arc<dyn ContentEditorService>,
    store: Arc<dyn DocumentStore>,
}

impl OpenAiSupervisorAdapter {
    /// Creates a new `OpenAiSupervisorAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        model: String,
        editor: Arc<dyn ContentEditorService>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            client,
            model,
            editor,
            store,
        }
    }

    /// Executes one tool call on behalf of the model.
    ///
    /// Failures are folded into the returned text; they must not escape this
    /// boundary, so the model can narrate them to the user.
    async fn dispatch_tool(&self, call: &PendingToolCall, resume_name: Option<&str>) -> String {
        match call.name.as_str() {
            "resume_content_editor" => {
                let Some(resume_name) = resume_name else {
                    return NO_RESUME_SELECTED.to_string();
                };
                let args: ResumeContentEditorArgs = match serde_json::from_str(&call.arguments) {
                    Ok(args) => args,
                    Err(e) => return format!("Invalid tool arguments: {}", e),
                };
                match self
                    .editor
                    .handle_request(&args.request, Some(resume_name))
                    .await
                {
                    Ok(output) => output,
                    Err(e) => format!("The resume content editor failed: {}", e),
                }
            }
            "list_resumes" => match self.store.list_resumes().await {
                Ok(names) if names.is_empty() => "No resumes exist yet.".to_string(),
                Ok(names) => names.join("\n"),
                Err(e) => format!("Failed to list resumes: {}", e),
            },
            other => {
                warn!("Supervisor requested unknown tool '{}'", other);
                format!("Unknown tool: {}", other)
            }
        }
    }
}

fn history_messages(
    history: &[ChatTurn],
) -> PortResult<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> =
        vec![ChatCompletionRequestSystemMessageArgs::default()
            .content(SUPERVISOR_AGENT_PROMPT)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

    for turn in history {
        let message = match turn.role {
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        };
        messages.push(message);
    }
    Ok(messages)
}

//=========================================================================================
// `SupervisorService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SupervisorService for OpenAiSupervisorAdapter {
    async fn stream_chat(
        &self,
        history: Vec<ChatTurn>,
        resume_name: Option<String>,
    ) -> PortResult<ChatStream> {
        let initial_messages = history_messages(&history)?;
        let adapter = self.clone();

        let stream = async_stream::try_stream! {
            let mut messages = initial_messages;
            loop {
                let request = CreateChatCompletionRequestArgs::default()
                    .model(&adapter.model)
                    .messages(messages.clone())
                    .tools(supervisor_tool_definitions()?)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;

                let mut chunks = adapter
                    .client
                    .chat()
                    .create_stream(request)
                    .await
                    .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

                let mut round_text = String::new();
                let mut pending: Vec<PendingToolCall> = Vec::new();

                while let Some(chunk) = chunks.next().await {
                    let chunk = chunk.map_err(|e| PortError::Unexpected(e.to_string()))?;
                    let Some(choice) = chunk.choices.into_iter().next() else {
                        continue;
                    };
                    if let Some(tool_deltas) = choice.delta.tool_calls {
                        merge_tool_call_chunks(&mut pending, tool_deltas);
                    }
                    if let Some(text) = choice.delta.content {
                        if !text.is_empty() {
                            round_text.push_str(&text);
                            yield text;
                        }
                    }
                }

                if pending.is_empty() {
                    break;
                }

                // Delegation blocks the outer reply; the delegate's own output
                // is folded into the transcript, not re-streamed.
                messages.push(assistant_turn_with_tool_calls(&round_text, &pending)?);
                for call in pending {
                    info!("Supervisor delegating to tool '{}'", call.name);
                    let output = adapter.dispatch_tool(&call, resume_name.as_deref()).await;
                    messages.push(
                        ChatCompletionRequestToolMessageArgs::default()
                            .tool_call_id(call.id)
                            .content(output)
                            .build()
                            .map_err(|e| PortError::Unexpected(e.to_string()))?
                            .into(),
                    );
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

//=========================================================================================
// Tests
//=========================================================================================
