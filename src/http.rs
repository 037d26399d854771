use crate::db::Database;
use crate::errors::AppError;
use crate::models::{ApiEnvelope, EndorsementResult, Profile, UpsertProfilePayload};
use crate::service::ProfileService;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};

pub const API_BASE_PATH: &str = "/api";

const SERVER_ERROR: &str = "Server Error";

#[derive(Clone)]
pub struct AppState {
    pub service: ProfileService<Database>,
}

/// Routes under `/api` plus an unversioned `/health` check.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/endorse/:skill_id", patch(endorse_skill));

    Router::new()
        .route("/health", get(health))
        .nest(API_BASE_PATH, api)
        .with_state(state)
}

/// Maps the service error taxonomy onto status codes and the failure envelope.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AppError::Validation(message) => {
                tracing::debug!(error = %self.0, "request rejected");
                (StatusCode::BAD_REQUEST, ApiEnvelope::<()>::failure(message, None))
            }
            AppError::NotFound(message) => {
                tracing::debug!(error = %self.0, "resource missing");
                (StatusCode::NOT_FOUND, ApiEnvelope::<()>::failure(message, None))
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiEnvelope::<()>::failure(SERVER_ERROR, Some(other.message().to_string())),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiEnvelope<T>>, ApiError>;

#[tracing::instrument(skip_all)]
async fn get_profile(State(state): State<AppState>) -> ApiResult<Profile> {
    let profile = state.service.fetch()?;
    Ok(Json(ApiEnvelope::ok(profile)))
}

#[tracing::instrument(skip_all)]
async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<UpsertProfilePayload>, JsonRejection>,
) -> ApiResult<Profile> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let profile = state.service.upsert(payload)?;
    Ok(Json(ApiEnvelope::ok_with_message(profile, "Profile updated successfully")))
}

#[tracing::instrument(skip_all, fields(skill_id = %skill_id))]
async fn endorse_skill(State(state): State<AppState>, Path(skill_id): Path<String>) -> ApiResult<EndorsementResult> {
    let result = state.service.endorse(&skill_id)?;
    Ok(Json(ApiEnvelope::ok_with_message(result, "Skill endorsed successfully")))
}

async fn health() -> Json<ApiEnvelope<()>> {
    Json(ApiEnvelope {
        success: true,
        data: None,
        message: Some("ok".to_string()),
        error: None,
    })
}
