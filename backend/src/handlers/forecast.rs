//! HTTP handlers for demand forecast endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::services::forecast::{ForecastService, SkuForecastResponse};
use crate::AppState;
use shared::{DailyDemand, YearMonth};

/// Get the full historical + projected forecast response for a SKU
pub async fn get_sku_forecast(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<SkuForecastResponse>> {
    let service = ForecastService::new(state.db);
    let response = service.sku_forecast(&sku).await?;
    Ok(Json(response))
}

/// Get one future month's daily demand curve
pub async fn get_daily_breakdown(
    State(state): State<AppState>,
    Path((sku, year_month)): Path<(String, String)>,
) -> AppResult<Json<Vec<DailyDemand>>> {
    let year_month: YearMonth =
        year_month
            .parse()
            .map_err(|message: &'static str| AppError::Validation {
                field: "year_month".to_string(),
                message: message.to_string(),
            })?;
    let service = ForecastService::new(state.db);
    let breakdown = service.daily_breakdown(&sku, year_month).await?;
    Ok(Json(breakdown))
}
