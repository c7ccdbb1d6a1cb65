use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Application, ApplicationId, ApplicationStatus};
use super::repository::{
    ApplicationRepository, ApplicationStatusView, OverrideRepository, RepositoryError,
};
use super::service::{BoardPackageService, BoardPackageServiceError};

type SharedService<A, O> = Arc<BoardPackageService<A, O>>;

/// Router builder exposing completeness, override, and submission endpoints.
pub fn board_package_router<A, O>(service: SharedService<A, O>) -> Router
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/board-packages",
            post(register_handler::<A, O>).get(pipeline_handler::<A, O>),
        )
        .route(
            "/api/v1/board-packages/:application_id",
            get(status_handler::<A, O>),
        )
        .route(
            "/api/v1/board-packages/:application_id/completeness",
            get(completeness_handler::<A, O>),
        )
        .route(
            "/api/v1/board-packages/:application_id/overrides",
            get(list_overrides_handler::<A, O>).post(record_override_handler::<A, O>),
        )
        .route(
            "/api/v1/board-packages/:application_id/audit-log",
            get(audit_log_handler::<A, O>),
        )
        .route(
            "/api/v1/board-packages/:application_id/submit",
            post(submit_handler::<A, O>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineQuery {
    #[serde(default)]
    pub(crate) status: Option<ApplicationStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverrideRequest {
    pub(crate) section_key: String,
    pub(crate) overridden_by: String,
    #[serde(default)]
    pub(crate) reason: String,
}

pub(crate) async fn register_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Json(application): Json<Application>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.register(application) {
        Ok(stored) => {
            let view = ApplicationStatusView::from(&stored);
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pipeline_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Query(query): Query<PipelineQuery>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    let status = query.status.unwrap_or(ApplicationStatus::Submitted);
    match service.pipeline(status) {
        Ok(applications) => {
            let views: Vec<ApplicationStatusView> = applications
                .iter()
                .map(ApplicationStatusView::from)
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => {
            let view = ApplicationStatusView::from(&application);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn completeness_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.completeness(&ApplicationId(application_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_overrides_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.overrides(&ApplicationId(application_id)) {
        Ok(overrides) => (StatusCode::OK, Json(overrides)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_override_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
    Json(request): Json<OverrideRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.record_override(
        &id,
        &request.section_key,
        &request.overridden_by,
        &request.reason,
    ) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn audit_log_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.audit_log(&ApplicationId(application_id)) {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<A, O>(
    State(service): State<SharedService<A, O>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    O: OverrideRepository + 'static,
{
    match service.submit(&ApplicationId(application_id)) {
        Ok(application) => {
            let view = ApplicationStatusView::from(&application);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: BoardPackageServiceError) -> Response {
    let status = match &error {
        BoardPackageServiceError::Configuration(_) | BoardPackageServiceError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        BoardPackageServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BoardPackageServiceError::Repository(RepositoryError::Conflict)
        | BoardPackageServiceError::SubmissionBlocked { .. }
        | BoardPackageServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        BoardPackageServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        BoardPackageServiceError::SubmissionBlocked {
            blocking,
            completion_percentage,
        } => json!({
            "error": error.to_string(),
            "blocking_sections": blocking,
            "completion_percentage": completion_percentage,
        }),
        _ => json!({ "error": error.to_string() }),
    };
    (status, Json(payload)).into_response()
}
