use axum::{extract::{Path, Query, State}, http::StatusCode, Json};

use crate::domain::aggregates::Order;
use crate::domain::requests::{CreateOrderRequest, ListOrdersQuery, UpdateOrderStatusRequest};
use crate::domain::responses::{OrderDetail, OrderPlacedResponse, Paginated};
use crate::errors::HttpError;
use crate::handler::extract::JsonBody;
use crate::state::AppState;

pub async fn create_order(State(s): State<AppState>, JsonBody(r): JsonBody<CreateOrderRequest>) -> Result<(StatusCode, Json<OrderPlacedResponse>), HttpError> {
    let order_id = s.orders.place_order(&r).await?;
    Ok((StatusCode::CREATED, Json(OrderPlacedResponse { order_id })))
}

pub async fn list_orders(State(s): State<AppState>, Query(q): Query<ListOrdersQuery>) -> Result<Json<Paginated<Order>>, HttpError> {
    Ok(Json(s.orders.list_orders(&q).await?))
}

pub async fn get_order(State(s): State<AppState>, Path(id): Path<i64>) -> Result<Json<OrderDetail>, HttpError> {
    Ok(Json(s.orders.get_order(id).await?))
}

pub async fn update_status(State(s): State<AppState>, Path(id): Path<i64>, JsonBody(r): JsonBody<UpdateOrderStatusRequest>) -> Result<StatusCode, HttpError> {
    s.orders.update_status(id, r.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
