use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::models::pattern::{MultiTimeframeReport, PatternsQuery};
use crate::services::cancel::CancelToken;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/patterns",
    params(PatternsQuery),
    responses(
        (status = 200, description = "Patterns detected on 1h, 6h and 1d candles", body = MultiTimeframeReport),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_patterns(
    State(state): State<AppState>,
    Query(query): Query<PatternsQuery>,
) -> Result<Json<MultiTimeframeReport>, AppError> {
    query
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;

    let report = state.analyzer.analyze(&query.symbol, &CancelToken::new()).await;
    Ok(Json(report))
}
