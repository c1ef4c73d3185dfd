use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::classifier::{LabelDecoder, RiskModel};
use super::log::ResultSink;
use super::report;
use super::service::{ScreeningError, ScreeningService};
use super::session::DemographicsForm;
use super::store::{SessionId, SessionStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: u8,
    pub score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackRequest {
    pub question: u8,
}

/// Router builder exposing the screening workflow over HTTP.
pub fn screening_router<S, M, D, L>(service: Arc<ScreeningService<S, M, D, L>>) -> Router
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    Router::new()
        .route("/api/v1/screenings", post(create_handler::<S, M, D, L>))
        .route("/api/v1/screenings/:session_id", get(step_handler::<S, M, D, L>))
        .route(
            "/api/v1/screenings/:session_id/demographics",
            post(demographics_handler::<S, M, D, L>),
        )
        .route(
            "/api/v1/screenings/:session_id/answers",
            post(answer_handler::<S, M, D, L>),
        )
        .route(
            "/api/v1/screenings/:session_id/back",
            post(back_handler::<S, M, D, L>),
        )
        .route(
            "/api/v1/screenings/:session_id/restart",
            post(restart_handler::<S, M, D, L>),
        )
        .route(
            "/api/v1/screenings/:session_id/result",
            post(finalize_handler::<S, M, D, L>).get(result_handler::<S, M, D, L>),
        )
        .route(
            "/api/v1/screenings/:session_id/report",
            get(report_handler::<S, M, D, L>),
        )
        .with_state(service)
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        let payload = json!({
            "error": "screening session not found",
        });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    })
}

fn error_response(error: &ScreeningError) -> Response {
    let status = match error {
        ScreeningError::Intake(_)
        | ScreeningError::Transition(_)
        | ScreeningError::Incomplete(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningError::Prediction(_) => StatusCode::BAD_GATEWAY,
        ScreeningError::ResultNotReady => StatusCode::CONFLICT,
        ScreeningError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = match error {
        ScreeningError::Incomplete(incomplete) => json!({
            "error": error.to_string(),
            "next_question": incomplete.next_question,
        }),
        ScreeningError::Prediction(_) => json!({
            "error": error.to_string(),
            "retry": "re-request the result; recorded answers are preserved",
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn create_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    match service.create() {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn step_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.step(&session_id) {
        Ok(step) => (StatusCode::OK, axum::Json(step)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn demographics_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
    axum::Json(form): axum::Json<DemographicsForm>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.submit_demographics(&session_id, &form) {
        Ok(step) => (StatusCode::OK, axum::Json(step)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn answer_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.answer(&session_id, request.question, request.score) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn back_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<BackRequest>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.go_back(&session_id, request.question) {
        Ok(step) => (StatusCode::OK, axum::Json(step)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn restart_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.restart(&session_id) {
        Ok(step) => (StatusCode::OK, axum::Json(step)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn finalize_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.finalize(&session_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn result_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match service.result(&session_id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn report_handler<S, M, D, L>(
    State(service): State<Arc<ScreeningService<S, M, D, L>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    M: RiskModel + 'static,
    D: LabelDecoder + 'static,
    L: ResultSink + 'static,
{
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let summary = match service.summary(&session_id) {
        Ok(summary) => summary,
        Err(error) => return error_response(&error),
    };
    match report::render_summary(&summary) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            bytes,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
