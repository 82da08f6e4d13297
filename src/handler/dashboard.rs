use axum::{extract::{Query, State}, Json};

use crate::domain::requests::DashboardQuery;
use crate::domain::responses::{ChartData, DashboardStats, TopProduct};
use crate::errors::HttpError;
use crate::state::AppState;

pub async fn stats(State(s): State<AppState>, Query(q): Query<DashboardQuery>) -> Result<Json<DashboardStats>, HttpError> {
    Ok(Json(s.dashboard.stats(&q.range()).await?))
}

pub async fn chart(State(s): State<AppState>, Query(q): Query<DashboardQuery>) -> Result<Json<ChartData>, HttpError> {
    Ok(Json(s.dashboard.chart(&q.range()).await?))
}

pub async fn top_products(State(s): State<AppState>, Query(q): Query<DashboardQuery>) -> Result<Json<Vec<TopProduct>>, HttpError> {
    Ok(Json(s.dashboard.top_products(&q.range(), q.limit).await?))
}
