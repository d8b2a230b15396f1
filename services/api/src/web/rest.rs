//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::chat::ChatRequest;
use crate::web::state::AppState;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use resume_assistant_core::{domain::Resume, ports::PortError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::chat::chat_handler,
        list_resumes_handler,
        create_resume_handler,
        get_resume_handler,
        save_resume_handler,
        preview_resume_handler,
        get_conversation_handler,
    ),
    components(
        schemas(ChatRequest, CreateResumeRequest)
    ),
    tags(
        (name = "Resume Assistant API", description = "API endpoints for the conversational resume builder.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// The payload for creating a fresh resume document.
#[derive(Deserialize, ToSchema)]
pub struct CreateResumeRequest {
    /// File name the document is stored under.
    pub resume_name: String,
    /// Display name on the resume itself.
    pub name: String,
    pub date_of_birth: NaiveDate,
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn map_port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(name) => (StatusCode::NOT_FOUND, format!("'{}' was not found", name)),
        PortError::Unexpected(_) => {
            error!("Resume request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the names of all stored resumes.
#[utoipa::path(
    get,
    path = "/resumes",
    responses(
        (status = 200, description = "Resume names as a JSON array of strings"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_resumes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let names = app_state
        .store
        .list_resumes()
        .await
        .map_err(map_port_error)?;
    Ok(Json(names))
}

/// Create an empty resume with a fresh identity and store it.
#[utoipa::path(
    post,
    path = "/resumes",
    request_body = CreateResumeRequest,
    responses(
        (status = 201, description = "The created resume document"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_resume_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateResumeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let resume = Resume::new(payload.name, payload.date_of_birth);
    app_state
        .store
        .save_resume(&resume, &payload.resume_name)
        .await
        .map_err(map_port_error)?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// Fetch one resume document in full.
#[utoipa::path(
    get,
    path = "/resumes/{name}",
    params(("name" = String, Path, description = "The resume's stored name")),
    responses(
        (status = 200, description = "The resume document"),
        (status = 404, description = "No resume of that name exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_resume_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let resume = app_state
        .store
        .get_resume(&name)
        .await
        .map_err(map_port_error)?;
    Ok(Json(resume))
}

/// Overwrite one resume document in full. Whole-document save; no merge.
#[utoipa::path(
    put,
    path = "/resumes/{name}",
    params(("name" = String, Path, description = "The resume's stored name")),
    responses(
        (status = 204, description = "Saved"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_resume_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(resume): Json<Resume>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .save_resume(&resume, &name)
        .await
        .map_err(map_port_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the renderable projection of a resume: hidden items removed.
#[utoipa::path(
    get,
    path = "/resumes/{name}/preview",
    params(("name" = String, Path, description = "The resume's stored name")),
    responses(
        (status = 200, description = "The resume with only visible items retained"),
        (status = 404, description = "No resume of that name exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn preview_resume_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let resume = app_state
        .store
        .get_resume(&name)
        .await
        .map_err(map_port_error)?;
    Ok(Json(resume.filter_visible()))
}

/// Read back a conversation's full history in append order.
#[utoipa::path(
    get,
    path = "/conversations/{id}",
    params(("id" = String, Path, description = "The conversation id")),
    responses(
        (status = 200, description = "Role-tagged turns, oldest first; empty for unknown ids"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_conversation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let turns = app_state
        .conversation_log
        .read_all(&id)
        .await
        .map_err(map_port_error)?;
    Ok(Json(turns))
}
