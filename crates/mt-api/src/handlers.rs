//! # mt-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the `MistakeRepo` port.

use std::sync::Arc;

use askama::Template;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use mt_core::{
    AnalyticsSnapshot, AppError, Mistake, MistakeFilter, MistakePatch, MistakeRepo, MistakeType,
    NewMistake,
};
use mt_ui::IndexTemplate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{ApiResult, NO_DATA};

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn MistakeRepo>,
}

impl AppState {
    pub fn new(repo: Arc<dyn MistakeRepo>) -> Self {
        Self { repo }
    }
}

/// Unwraps the buffered body. Only an over-limit body is reported as such;
/// any other read failure counts as no data.
fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::ValidationError(NO_DATA.into())
        }
    })
}

/// Decodes a request body that must be a non-empty JSON object.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| AppError::ValidationError(NO_DATA.into()))?;
    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(AppError::ValidationError(NO_DATA.into())),
    }
    serde_json::from_value(value)
        .map_err(|e| AppError::ValidationError(format!("invalid mistake payload: {e}")))
}

/// Renders the index page (form, filters, list and analytics).
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<MistakeFilter>,
) -> ApiResult<Html<String>> {
    let mistakes = state.repo.list(filter.clone()).await?;
    let topics = state.repo.topics().await?;
    let analytics = state.repo.analytics().await?;

    let html = IndexTemplate::new(&topics, &mistakes, &analytics, &filter)
        .render()
        .map_err(|e| AppError::Internal(format!("template rendering failed: {e}")))?;
    Ok(Html(html))
}

pub async fn list_mistakes(
    State(state): State<AppState>,
    Query(filter): Query<MistakeFilter>,
) -> ApiResult<Json<Vec<Mistake>>> {
    Ok(Json(state.repo.list(filter).await?))
}

pub async fn create_mistake(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<Mistake>)> {
    let input: NewMistake = parse_body(&read_body(body)?)?;
    let mistake = state.repo.add(input).await?;
    Ok((StatusCode::CREATED, Json(mistake)))
}

pub async fn get_mistake(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Mistake>> {
    match state.repo.get(&id).await? {
        Some(mistake) => Ok(Json(mistake)),
        None => Err(AppError::mistake_not_found(&id).into()),
    }
}

/// Named "update" on the wire but only overwrites the fields sent.
pub async fn update_mistake(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Mistake>> {
    let patch: MistakePatch = parse_body(&read_body(body)?)?;
    match state.repo.update(&id, patch).await? {
        Some(mistake) => Ok(Json(mistake)),
        None => Err(AppError::mistake_not_found(&id).into()),
    }
}

pub async fn delete_mistake(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.repo.delete(&id).await? {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(AppError::mistake_not_found(&id).into())
    }
}

pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.repo.topics().await?))
}

pub async fn analytics(State(state): State<AppState>) -> ApiResult<Json<AnalyticsSnapshot>> {
    Ok(Json(state.repo.analytics().await?))
}

pub async fn mistake_types() -> Json<Vec<&'static str>> {
    Json(MistakeType::labels())
}
