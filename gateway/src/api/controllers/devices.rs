use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::error::ApiError;
use crate::api::models::device::DeviceListResponse;
use crate::api::state::ApiState;

pub async fn list(
    State(state): State<ApiState>,
) -> Result<(StatusCode, Json<DeviceListResponse>), ApiError> {
    let devices = state.tracker_client().fetch_devices().await?;

    tracing::info!(count = devices.result_list.len(), "fetched devices from tracker");

    let status = if state.config().legacy_status_codes {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(devices)))
}
