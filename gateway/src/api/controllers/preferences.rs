use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::error::ApiError;
use crate::api::models::preferences::UserPreferences;
use crate::api::state::ApiState;
use crate::utils;

pub async fn get(State(state): State<ApiState>) -> Result<Json<UserPreferences>, ApiError> {
    let preferences = state.preferences_store().load().await?;
    Ok(Json(preferences))
}

pub async fn save(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserPreferences>), ApiError> {
    // NOTE: Not `Json`: any decoding error must be a 400, whatever the content type.
    // A bare `null` document saves empty preferences.
    let preferences = utils::serde::decode_first::<Option<UserPreferences>>(&body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            tracing::debug!("rejected preferences: {e}");
            ApiError::BadRequest(e.to_string())
        })?;

    state.preferences_store().save(&preferences).await?;

    tracing::info!(sort = %preferences.sort, "preferences updated");

    Ok((StatusCode::CREATED, Json(preferences)))
}
