//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        conversation::InMemoryConversationLog, editor_llm::OpenAiEditorAdapter,
        store::FsDocumentStore, supervisor_llm::OpenAiSupervisorAdapter,
    },
    config::Config,
    error::ApiError,
    web::{rest::ApiDoc, router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use resume_assistant_core::ports::{ConversationLog, DocumentStore, SupervisorService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Set Up Document Storage & Conversation Log ---
    info!("Opening document store at {:?}...", config.documents_dir);
    let store: Arc<dyn DocumentStore> = Arc::new(FsDocumentStore::new(&config.documents_dir)?);
    let conversation_log: Arc<dyn ConversationLog> = Arc::new(InMemoryConversationLog::new());

    // --- 3. Initialize Agent Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let editor = Arc::new(OpenAiEditorAdapter::new(
        openai_client.clone(),
        config.editor_model.clone(),
        store.clone(),
    ));
    let supervisor: Arc<dyn SupervisorService> = Arc::new(OpenAiSupervisorAdapter::new(
        openai_client.clone(),
        config.supervisor_model.clone(),
        editor,
        store.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        conversation_log,
        supervisor,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = router(app_state).layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
