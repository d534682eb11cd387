use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use greenside_core::{CourseId, DataKind};
use greenside_storage::{decode_value, encode_value};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::server::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "message": "Welcome to the Golf Course API",
        "status": "operational",
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn courses(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.courses.all().to_vec()))
}

pub async fn coordinates(State(state): State<AppState>, Path(course_id): Path<String>) -> Response {
    resolve(&state, &course_id, DataKind::Coordinates).await
}

pub async fn info(State(state): State<AppState>, Path(course_id): Path<String>) -> Response {
    resolve(&state, &course_id, DataKind::Info).await
}

async fn resolve(state: &AppState, course_id: &str, kind: DataKind) -> Response {
    let course_id = match CourseId::new(course_id) {
        Ok(id) => id,
        Err(e) => return ApiError::BadRequest(e.to_string()).into_response(),
    };
    match state.resolver.resolve(&course_id, kind).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            tracing::warn!(course_id = %course_id, kind = %kind, error = %e, "Resolve failed");
            e.into_response()
        }
    }
}

/// Returns a raw cache row. JSON text is decoded; anything else is returned as stored.
pub async fn get_cache(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state.store.get(&key).await?.ok_or(ApiError::NotFound)?;
    let value = decode_value(&entry.value).unwrap_or(entry.value);
    Ok((StatusCode::OK, Json(json!({"key": key, "value": value}))))
}

/// Stores `{key, value}`. Structured values are serialized, strings are kept verbatim.
pub async fn put_cache(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let missing = || ApiError::BadRequest("Missing key or value".into());

    let mut data: Value = serde_json::from_slice(&body).map_err(|_| missing())?;
    let key = match data.get("key") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(missing()),
    };
    let value = match data.get_mut("value").map(Value::take) {
        Some(Value::Null) | None => return Err(missing()),
        Some(v) => v,
    };

    state.store.put(&key, &encode_value(&value)).await?;
    tracing::debug!(key = %key, "Cache row written");

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "key": key})),
    ))
}
