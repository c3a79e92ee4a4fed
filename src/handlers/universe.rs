use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::universe::UniverseResponse;
use crate::services::cancel::CancelToken;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/universe",
    responses(
        (status = 200, description = "Symbols a scan covers", body = UniverseResponse),
        (status = 502, description = "Exchange listing unavailable", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_universe(State(state): State<AppState>) -> Result<Json<UniverseResponse>, AppError> {
    let symbols = state
        .universe
        .symbols(&CancelToken::new())
        .await
        .map_err(|error| AppError::Upstream(error.to_string()))?;

    Ok(Json(UniverseResponse { symbols }))
}
