//! REST endpoints for driving wizard sessions.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::advisor::AdviceCategory;
use crate::error::{Error, PrefillError, WizardError};

use super::fields::{FieldKey, FieldValue};
use super::manager::SessionManager;

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub manager: Arc<SessionManager>,
}

/// Error wrapper that renders as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Wizard(WizardError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Error::Wizard(WizardError::AtLastStep | WizardError::AtFirstStep) => {
                StatusCode::CONFLICT
            }
            Error::Wizard(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Prefill(PrefillError::InvalidUrl { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Prefill(_) => StatusCode::BAD_GATEWAY,
            Error::AdvisorUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::Config(_) | Error::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "Request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AdviceBody {
    category: AdviceCategory,
    #[serde(default)]
    input: String,
}

#[derive(Debug, Deserialize)]
struct PrefillBody {
    url: String,
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// POST /api/sessions
async fn create_session(State(state): State<WizardRouteState>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(state.manager.create().await))
}

/// GET /api/sessions/{id}
async fn get_session(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.manager.view(id).await?))
}

/// DELETE /api/sessions/{id}
async fn delete_session(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.manager.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/sessions/{id}/inputs
///
/// Body is an object of field key to value. Either every input is accepted
/// or none is.
async fn put_inputs(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<HashMap<String, FieldValue>>,
) -> Result<impl IntoResponse, ApiError> {
    let inputs = body
        .into_iter()
        .map(|(key, value)| Ok((key.parse::<FieldKey>()?, value)))
        .collect::<Result<Vec<_>, WizardError>>()?;

    let view = state
        .manager
        .with_session(id, |s| {
            s.set_inputs(inputs)?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/next
async fn next_step(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .manager
        .with_session(id, |s| {
            s.advance()?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/previous
async fn previous_step(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .manager
        .with_session(id, |s| {
            s.retreat()?;
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/{id}/restart
async fn restart(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .manager
        .with_session(id, |s| {
            s.restart();
            Ok(s.view())
        })
        .await?;
    Ok(Json(view))
}

/// GET /api/sessions/{id}/score
async fn get_score(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .manager
        .with_session(id, |s| Ok(s.score_report()))
        .await?;
    Ok(Json(report))
}

/// POST /api/sessions/{id}/advice
async fn post_advice(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AdviceBody>,
) -> Result<impl IntoResponse, ApiError> {
    let answer = state.manager.advise(id, body.category, &body.input).await?;
    Ok(Json(answer))
}

/// POST /api/sessions/{id}/prefill
async fn post_prefill(
    State(state): State<WizardRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PrefillBody>,
) -> Result<impl IntoResponse, ApiError> {
    let analysis = state.manager.prefill(id, &body.url).await?;
    Ok(Json(analysis))
}

/// Build the wizard REST routes with tracing and permissive CORS.
pub fn wizard_routes(manager: Arc<SessionManager>) -> Router {
    let state = WizardRouteState { manager };

    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/inputs", put(put_inputs))
        .route("/api/sessions/{id}/next", post(next_step))
        .route("/api/sessions/{id}/previous", post(previous_step))
        .route("/api/sessions/{id}/restart", post(restart))
        .route("/api/sessions/{id}/score", get(get_score))
        .route("/api/sessions/{id}/advice", post(post_advice))
        .route("/api/sessions/{id}/prefill", post(post_prefill))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let cases = [
            (Error::from(WizardError::SessionNotFound(Uuid::nil())), StatusCode::NOT_FOUND),
            (Error::from(WizardError::AtFirstStep), StatusCode::CONFLICT),
            (Error::from(WizardError::AtLastStep), StatusCode::CONFLICT),
            (
                Error::from(WizardError::UnknownField("colour".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (Error::AdvisorUnavailable, StatusCode::SERVICE_UNAVAILABLE),
            (
                Error::from(PrefillError::EmptyPage { url: "https://a.b".into() }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                Error::from(PrefillError::InvalidUrl {
                    url: "a".into(),
                    reason: "relative".into(),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }
}
