use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use crate::{
    app_state::AppState,
    domain::{
        models::{SpeechId, SpeechPatch, SpeechView, ISO_DATE},
        search::SearchCriteria,
    },
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_speeches).post(create_speech))
        .route("/search", get(search_speeches))
        .route(
            "/:id",
            get(get_speech).put(update_speech).delete(delete_speech),
        )
}

fn speech_id(path: Result<Path<i64>, PathRejection>) -> Result<SpeechId, ApiError> {
    let Path(id) = path.map_err(|err| ApiError::bad_request(err.body_text()))?;
    Ok(SpeechId::new(id))
}

fn payload(body: Result<Json<SpeechView>, JsonRejection>) -> Result<SpeechView, ApiError> {
    let Json(view) = body.map_err(|err| ApiError::bad_request(err.body_text()))?;
    Ok(view)
}

/// Blank date parameters count as absent.
fn parse_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Date::parse(s, ISO_DATE)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("could not parse date: {}", s))),
    }
}

#[instrument(name = "GET /speeches", skip(app_state))]
async fn list_speeches(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<SpeechView>>, ApiError> {
    let speeches = app_state.speech_service.list_all().await?;
    Ok(Json(speeches))
}

#[instrument(name = "GET /speeches/:id", skip(app_state))]
async fn get_speech(
    State(app_state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SpeechView>, ApiError> {
    let id = speech_id(path)?;
    app_state
        .speech_service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("speech {} not found", id)))
}

#[instrument(name = "POST /speeches", skip(app_state, body))]
async fn create_speech(
    State(app_state): State<AppState>,
    body: Result<Json<SpeechView>, JsonRejection>,
) -> Result<Json<SpeechView>, ApiError> {
    let view = payload(body)?;
    let created = app_state.speech_service.create(view).await?;
    Ok(Json(created))
}

#[instrument(name = "PUT /speeches/:id", skip(app_state, body))]
async fn update_speech(
    State(app_state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<SpeechView>, JsonRejection>,
) -> Result<Json<SpeechView>, ApiError> {
    let id = speech_id(path)?;
    let patch = SpeechPatch::from(payload(body)?);

    app_state
        .speech_service
        .update(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("speech {} not found", id)))
}

#[instrument(name = "DELETE /speeches/:id", skip(app_state))]
async fn delete_speech(
    State(app_state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = speech_id(path)?;
    if app_state.speech_service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("speech {} not found", id)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    author: Option<String>,
    from: Option<String>,
    to: Option<String>,
    keyword: Option<String>,
    text: Option<String>,
}

#[instrument(name = "GET /speeches/search", skip(app_state))]
async fn search_speeches(
    State(app_state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<SpeechView>>, ApiError> {
    let Query(query) = query.map_err(|err| ApiError::bad_request(err.body_text()))?;

    let criteria = SearchCriteria {
        from: parse_date(query.from.as_deref())?,
        to: parse_date(query.to.as_deref())?,
        author: query.author,
        keyword: query.keyword,
        text: query.text,
    };

    let speeches = app_state.speech_service.search(criteria).await?;
    Ok(Json(speeches))
}
