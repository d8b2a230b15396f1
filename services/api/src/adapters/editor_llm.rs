//! services/api/src/adapters/editor_llm.rs
//!
//! This module contains the adapter for the resume content editor agent.
//! It implements the `ContentEditorService` port from the `core` crate.
//!
//! The editor is a delegate: the supervisor hands it one request at a time,
//! and it decides for itself whether to answer with a clarifying question or
//! to call its `read_resume_content` / `edit_resume_content` tools against
//! the currently selected resume.

const EDITOR_AGENT_PROMPT: &str = "You are a resume content editor. \
Your job is to help users improve their resumes by analyzing their content and providing suggestions and edits. \
Use the read_resume_content tool to inspect the selected resume; every element carries an `id` field, \
and edits are applied with the edit_resume_content tool by passing that id together with the full replacement element. \
Keep the element's id unchanged when editing it. \
You should ask clarifying questions if the user's request is ambiguous. \
Always confirm what changes will be made before applying them.";

/// Returned by both tools when the runtime context carries no resume name.
pub const NO_RESUME_SELECTED: &str = "No resume selected.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolArgs,
        ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObjectArgs,
    },
    Client,
};
use async_trait::async_trait;
use resume_assistant_core::{
    domain::ResumeElement,
    ports::{ContentEditorService, DocumentStore, PortError, PortResult},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

// The delegate answers in plain text once it stops calling tools; this bounds
// how many read/edit rounds a single request may take.
const MAX_TOOL_ROUNDS: usize = 8;

//=========================================================================================
// Tool Execution (pure of the LLM client, so it is testable in isolation)
//=========================================================================================

#[derive(Deserialize)]
struct EditResumeContentArgs {
    element_id: String,
    new_content: ResumeElement,
}

/// The editor's two callable operations, scoped to one selected resume.
///
/// Failures never escape as errors: every outcome, including a missing
/// selection or an unknown document, is reported as text for the calling
/// agent to reason about.
#[derive(Clone)]
pub struct EditorTools {
    store: Arc<dyn DocumentStore>,
}

impl EditorTools {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Loads the selected resume and returns it as pretty JSON.
    pub async fn read_resume_content(&self, resume_name: Option<&str>) -> String {
        let Some(resume_name) = resume_name else {
            return NO_RESUME_SELECTED.to_string();
        };
        match self.store.get_resume(resume_name).await {
            Ok(resume) => serde_json::to_string_pretty(&resume)
                .unwrap_or_else(|e| format!("Failed to serialize resume: {}", e)),
            Err(PortError::NotFound(_)) => {
                format!("Resume '{}' was not found.", resume_name)
            }
            Err(e) => format!("Failed to load resume '{}': {}", resume_name, e),
        }
    }

    /// Applies one update-by-id mutation to the selected resume and persists it.
    pub async fn edit_resume_content(&self, resume_name: Option<&str>, arguments: &str) -> String {
        let Some(resume_name) = resume_name else {
            return NO_RESUME_SELECTED.to_string();
        };
        let args: EditResumeContentArgs = match serde_json::from_str(arguments) {
            Ok(args) => args,
            Err(e) => return format!("Invalid edit arguments: {}", e),
        };
        let mut resume = match self.store.get_resume(resume_name).await {
            Ok(resume) => resume,
            Err(PortError::NotFound(_)) => {
                return format!("Resume '{}' was not found.", resume_name);
            }
            Err(e) => return format!("Failed to load resume '{}': {}", resume_name, e),
        };

        if !resume.update_element(&args.element_id, args.new_content) {
            return "Failed to update resume content.".to_string();
        }
        if let Err(e) = self.store.save_resume(&resume, resume_name).await {
            return format!("Failed to save resume '{}': {}", resume_name, e);
        }
        "Resume content updated successfully.".to_string()
    }

    async fn dispatch(&self, name: &str, arguments: &str, resume_name: Option<&str>) -> String {
        match name {
            "read_resume_content" => self.read_resume_content(resume_name).await,
            "edit_resume_content" => self.edit_resume_content(resume_name, arguments).await,
            other => {
                warn!("Editor agent requested unknown tool '{}'", other);
                format!("Unknown tool: {}", other)
            }
        }
    }
}

fn editor_tool_definitions() -> PortResult<Vec<ChatCompletionTool>> {
    let read = ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name("read_resume_content")
                .description("Reads the content of the currently selected resume as JSON.")
                .parameters(serde_json::json!({
                    "type": "object",
                    "properties": {},
                }))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        )
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    let edit = ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name("edit_resume_content")
                .description(
                    "Replaces one element of the currently selected resume. \
                     The element is addressed by its id; the replacement must be the \
                     complete element, not a partial patch.",
                )
                .parameters(serde_json::json!({
                    "type": "object",
                    "properties": {
                        "element_id": {
                            "type": "string",
                            "description": "The unique identifier of the resume element to be updated.",
                        },
                        "new_content": {
                            "type": "object",
                            "description": "The full replacement element, tagged with its `type` \
                                            (link, skill, experience, education, certification, project, language).",
                        },
                    },
                    "required": ["element_id", "new_content"],
                }))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        )
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

    Ok(vec![read, edit])
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentEditorService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiEditorAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    tools: EditorTools,
}

impl OpenAiEditorAdapter {
    /// Creates a new `OpenAiEditorAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            client,
            model,
            tools: EditorTools::new(store),
        }
    }
}

//=========================================================================================
// `ContentEditorService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentEditorService for OpenAiEditorAdapter {
    /// Runs the editor agent for one delegated request.
    ///
    /// The loop alternates model calls and tool dispatch until the model
    /// replies with plain text; that text is the delegate's answer back to
    /// the supervisor.
    async fn handle_request(&self, request: &str, resume_name: Option<&str>) -> PortResult<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(EDITOR_AGENT_PROMPT)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        for _ in 0..MAX_TOOL_ROUNDS {
            let chat_request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(editor_tool_definitions()?)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(chat_request)
                .await
                .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

            let Some(choice) = response.choices.into_iter().next() else {
                return Err(PortError::Unexpected(
                    "Editor LLM returned no choices in its response.".to_string(),
                ));
            };
            let message = choice.message;

            match message.tool_calls {
                Some(tool_calls) if !tool_calls.is_empty() => {
                    let mut assistant = ChatCompletionRequestAssistantMessageArgs::default();
                    assistant.tool_calls(tool_calls.clone());
                    if let Some(content) = message.content {
                        assistant.content(content);
                    }
                    messages.push(
                        assistant
                            .build()
                            .map_err(|e| PortError::Unexpected(e.to_string()))?
                            .into(),
                    );

                    for call in tool_calls {
                        info!("Editor agent calling tool '{}'", call.function.name);
                        let output = self
                            .tools
                            .dispatch(&call.function.name, &call.function.arguments, resume_name)
                            .await;
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
                _ => return Ok(message.content.unwrap_or_default()),
            }
        }

        // Attempt-once policy: no retries, just report back.
        Ok(
            "I could not finish this request within the allowed number of tool calls. \
             Please try a more specific request."
                .to_string(),
        )
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::FsDocumentStore;
    use chrono::NaiveDate;
    use resume_assistant_core::domain::{Experience, Resume};

    async fn tools_with_resume() -> (EditorTools, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsDocumentStore::new(dir.path()).unwrap());

        let mut resume = Resume::new("Ada", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        resume.experience.push(Experience {
            id: "exp_ab12cd34".to_string(),
            company: "Initech".to_string(),
            role: "Engineer".to_string(),
            ..Experience::default()
        });
        store.save_resume(&resume, "ada.json").await.unwrap();

        (EditorTools::new(store), dir)
    }

    #[tokio::test]
    async fn both_tools_return_sentinel_without_selection() {
        let (tools, _dir) = tools_with_resume().await;
        assert_eq!(tools.read_resume_content(None).await, NO_RESUME_SELECTED);
        assert_eq!(
            tools.edit_resume_content(None, "{}").await,
            NO_RESUME_SELECTED
        );
    }

    #[tokio::test]
    async fn read_returns_serialized_document() {
        let (tools, _dir) = tools_with_resume().await;
        let output = tools.read_resume_content(Some("ada.json")).await;
        assert!(output.contains("exp_ab12cd34"));
        assert!(output.contains("Initech"));
    }

    #[tokio::test]
    async fn read_converts_not_found_to_text() {
        let (tools, _dir) = tools_with_resume().await;
        let output = tools.read_resume_content(Some("ghost.json")).await;
        assert_eq!(output, "Resume 'ghost.json' was not found.");
    }

    #[tokio::test]
    async fn edit_applies_and_persists_the_mutation() {
        let (tools, _dir) = tools_with_resume().await;
        let arguments = serde_json::json!({
            "element_id": "exp_ab12cd34",
            "new_content": {
                "type": "experience",
                "id": "exp_ab12cd34",
                "company": "Acme",
                "role": "Staff Engineer",
            },
        })
        .to_string();

        let output = tools.edit_resume_content(Some("ada.json"), &arguments).await;
        assert_eq!(output, "Resume content updated successfully.");

        let reloaded = tools.store.get_resume("ada.json").await.unwrap();
        assert_eq!(reloaded.experience[0].company, "Acme");
        assert_eq!(reloaded.experience[0].role, "Staff Engineer");
    }

    #[tokio::test]
    async fn edit_with_unknown_id_reports_failure_text() {
        let (tools, _dir) = tools_with_resume().await;
        let arguments = serde_json::json!({
            "element_id": "exp_nonexistent",
            "new_content": { "type": "experience", "company": "Acme" },
        })
        .to_string();

        let output = tools.edit_resume_content(Some("ada.json"), &arguments).await;
        assert_eq!(output, "Failed to update resume content.");

        // The stored document is untouched.
        let reloaded = tools.store.get_resume("ada.json").await.unwrap();
        assert_eq!(reloaded.experience[0].company, "Initech");
    }

    #[tokio::test]
    async fn edit_with_malformed_arguments_reports_failure_text() {
        let (tools, _dir) = tools_with_resume().await;
        let output = tools
            .edit_resume_content(Some("ada.json"), "not json at all")
            .await;
        assert!(output.starts_with("Invalid edit arguments:"));
    }
}
