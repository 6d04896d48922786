//! HTTP Server
//! JSON API over the loaded dashboard data using axum.

use crate::dashboard::{DashboardData, DashboardError, DashboardView};
use crate::data::Period;
use crate::summary::Plant;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

/// Shared application state, read-only after startup
type AppState = Arc<DashboardData>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("No periods available in the workbook")]
    NoPeriods,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Dashboard(e) if e.is_selection() => StatusCode::BAD_REQUEST,
            ApiError::Dashboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoPeriods => StatusCode::NOT_FOUND,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "dashboard request failed");
        } else {
            tracing::warn!(error = %self, "rejected dashboard request");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub period: Option<String>,
    pub plant: Option<String>,
}

pub fn router(data: AppState) -> Router {
    Router::new()
        .route("/api/periods", get(periods))
        .route("/api/dashboard", get(dashboard))
        .route("/health", get(health))
        .with_state(data)
}

pub async fn serve(data: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard API listening");
    axum::serve(listener, router(data)).await?;
    Ok(())
}

/// GET /api/periods - selectable periods, default first
async fn periods(State(data): State<AppState>) -> Json<Vec<Period>> {
    Json(data.periods().to_vec())
}

/// GET /api/dashboard?period=YYYY-MM&plant=USA
async fn dashboard(
    State(data): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>, ApiError> {
    let period = match params.period {
        Some(period) => period,
        None => data.default_period().ok_or(ApiError::NoPeriods)?.to_string(),
    };
    let plant = params
        .plant
        .unwrap_or_else(|| Plant::Usa.code().to_string());

    let view = data.view_for(&period, &plant)?;
    tracing::info!(period = %view.period, plant = %view.plant, "dashboard served");
    Ok(Json(view))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{raw_plants, raw_primary, raw_secondary};

    fn state() -> AppState {
        Arc::new(DashboardData::from_raw(raw_primary(), raw_secondary(), raw_plants()).unwrap())
    }

    fn params(period: Option<&str>, plant: Option<&str>) -> Query<DashboardParams> {
        Query(DashboardParams {
            period: period.map(str::to_string),
            plant: plant.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn lists_periods_in_order() {
        let Json(periods) = periods(State(state())).await;
        let labels: Vec<String> = periods.iter().map(Period::to_string).collect();
        assert_eq!(labels, ["2025-01", "2025-02"]);
    }

    #[tokio::test]
    async fn dashboard_defaults_to_first_period_and_usa() {
        let Json(view) = dashboard(State(state()), params(None, None)).await.unwrap();
        assert_eq!(view.period.to_string(), "2025-01");
        assert_eq!(view.plant, Plant::Usa);
    }

    #[tokio::test]
    async fn dashboard_honours_selection() {
        let Json(view) = dashboard(State(state()), params(Some("2025-02"), Some("uss")))
            .await
            .unwrap();
        assert_eq!(view.period.to_string(), "2025-02");
        assert_eq!(view.plant, Plant::Uss);
        assert_eq!(view.plant_product_lines.len(), 3);
    }

    #[tokio::test]
    async fn unknown_plant_is_bad_request() {
        let err = dashboard(State(state()), params(Some("2025-01"), Some("XYZ")))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_period_is_bad_request() {
        let err = dashboard(State(state()), params(Some("janeiro"), None))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        assert_eq!(health().await, "ok");
    }
}
