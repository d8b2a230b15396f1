//! services/api/tests/chat_api.rs
//!
//! End-to-end tests for the HTTP surface, run against a real server bound to
//! an ephemeral port. The supervisor is scripted so no model calls happen.

use api_lib::adapters::{FsDocumentStore, InMemoryConversationLog};
use api_lib::config::Config;
use api_lib::web::{router, state::AppState};
use async_trait::async_trait;
use resume_assistant_core::domain::{Resume, Skill};
use resume_assistant_core::ports::{
    ChatStream, ChatTurn, ConversationLog, DocumentStore, PortResult, SupervisorService,
};
use std::sync::Arc;
use tempfile::TempDir;

/// A supervisor that streams a fixed reply, naming the selected resume so the
/// tests can observe the context wiring.
struct ScriptedSupervisor;

#[async_trait]
impl SupervisorService for ScriptedSupervisor {
    async fn stream_chat(
        &self,
        _history: Vec<ChatTurn>,
        resume_name: Option<String>,
    ) -> PortResult<ChatStream> {
        let selected = resume_name.unwrap_or_else(|| "nothing".to_string());
        let chunks = vec![
            Ok("Working on ".to_string()),
            Ok(selected),
            Ok(" for you.".to_string()),
        ];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

fn test_config(documents_dir: &std::path::Path) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        documents_dir: documents_dir.to_path_buf(),
        log_level: tracing::Level::INFO,
        openai_api_key: None,
        supervisor_model: "gpt-4o".to_string(),
        editor_model: "gpt-4o-mini".to_string(),
    }
}

async fn spawn_app() -> (String, Arc<AppState>, TempDir) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");

    let store: Arc<dyn DocumentStore> =
        Arc::new(FsDocumentStore::new(tmp_dir.path()).expect("Failed to create store"));
    let conversation_log: Arc<dyn ConversationLog> = Arc::new(InMemoryConversationLog::new());
    let app_state = Arc::new(AppState {
        store,
        conversation_log,
        supervisor: Arc::new(ScriptedSupervisor),
        config: Arc::new(test_config(tmp_dir.path())),
    });

    let app = router(app_state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), app_state, tmp_dir)
}

#[tokio::test]
async fn chat_streams_reply_and_logs_turns_in_order() {
    let (base_url, app_state, _tmp) = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "request": "Polish my resume summary",
        "conversation_id": "c1",
        "resume_name": "ada.json",
    });
    let response = client
        .post(format!("{}/chat", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let text = response.text().await.unwrap();
    assert_eq!(text, "Working on ada.json for you.");

    // The full reply was persisted after the user turn.
    let turns = app_state.conversation_log.read_all("c1").await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].content, "Polish my resume summary");
    assert_eq!(turns[1].content, "Working on ada.json for you.");

    // The same history is also served over HTTP.
    let served: Vec<ChatTurn> = client
        .get(format!("{}/conversations/c1", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(served, turns);
}

#[tokio::test]
async fn chat_without_selected_resume_still_answers() {
    let (base_url, _app_state, _tmp) = spawn_app().await;
    let client = reqwest::Client::new();

    let body = serde_json::json!({
        "request": "Hello",
        "conversation_id": "c2",
    });
    let text = client
        .post(format!("{}/chat", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "Working on nothing for you.");
}

#[tokio::test]
async fn resume_crud_and_preview_round_trip() {
    let (base_url, _app_state, _tmp) = spawn_app().await;
    let client = reqwest::Client::new();

    // Create.
    let created: Resume = client
        .post(format!("{}/resumes", base_url))
        .json(&serde_json::json!({
            "resume_name": "ada.json",
            "name": "Ada Lovelace",
            "date_of_birth": "1815-12-10",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(created.id.starts_with("res_"));

    // List.
    let names: Vec<String> = client
        .get(format!("{}/resumes", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(names, vec!["ada.json"]);

    // Save a version with one hidden and one visible skill.
    let mut resume = created.clone();
    resume.skills.push(Skill {
        id: "ski_00000001".to_string(),
        name: "Analysis".to_string(),
        ..Skill::default()
    });
    resume.skills.push(Skill {
        id: "ski_00000002".to_string(),
        name: "Secret".to_string(),
        visible: false,
        ..Skill::default()
    });
    let save_status = client
        .put(format!("{}/resumes/ada.json", base_url))
        .json(&resume)
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(save_status, reqwest::StatusCode::NO_CONTENT);

    // Full document keeps both; preview drops the hidden one.
    let full: Resume = client
        .get(format!("{}/resumes/ada.json", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(full.skills.len(), 2);

    let preview: Resume = client
        .get(format!("{}/resumes/ada.json/preview", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preview.skills.len(), 1);
    assert_eq!(preview.skills[0].name, "Analysis");

    // Unknown documents are a 404, not a crash.
    let missing = client
        .get(format!("{}/resumes/ghost.json", base_url))
        .send()
        .await
        .unwrap()
        .status();
    assert_eq!(missing, reqwest::StatusCode::NOT_FOUND);
}
