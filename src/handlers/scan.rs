use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::scan::ScanStatusResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/scan",
    responses(
        (status = 202, description = "Scan started", body = ScanStatusResponse),
        (status = 409, description = "A scan is already running", body = crate::errors::ErrorResponse)
    )
)]
pub async fn start_scan(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ScanStatusResponse>), AppError> {
    state.scanner.start().await?;
    Ok((StatusCode::ACCEPTED, Json(state.scanner.status().await)))
}

#[utoipa::path(
    get,
    path = "/scan",
    responses(
        (status = 200, description = "Scan state and the latest ranked candidates", body = ScanStatusResponse)
    )
)]
pub async fn get_scan_status(
    State(state): State<AppState>,
) -> Result<Json<ScanStatusResponse>, AppError> {
    Ok(Json(state.scanner.status().await))
}

#[utoipa::path(
    delete,
    path = "/scan",
    responses(
        (status = 202, description = "Cancellation requested", body = ScanStatusResponse),
        (status = 409, description = "No scan is running", body = crate::errors::ErrorResponse)
    )
)]
pub async fn cancel_scan(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ScanStatusResponse>), AppError> {
    state.scanner.cancel().await?;
    Ok((StatusCode::ACCEPTED, Json(state.scanner.status().await)))
}
