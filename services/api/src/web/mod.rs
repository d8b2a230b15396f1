pub mod chat;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server router.
pub use chat::chat_handler;
pub use rest::{
    create_resume_handler, get_conversation_handler, get_resume_handler, list_resumes_handler,
    preview_resume_handler, save_resume_handler,
};

/// Builds the application router. Layers (CORS, Swagger UI) are added by the
/// binary; tests drive this router directly.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route(
            "/resumes",
            get(list_resumes_handler).post(create_resume_handler),
        )
        .route(
            "/resumes/{name}",
            get(get_resume_handler).put(save_resume_handler),
        )
        .route("/resumes/{name}/preview", get(preview_resume_handler))
        .route("/conversations/{id}", get(get_conversation_handler))
        .with_state(app_state)
}
