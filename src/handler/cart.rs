use axum::{extract::{Path, State}, http::StatusCode, Json};
use uuid::Uuid;

use crate::cart::{storage_key, CartStore};
use crate::domain::aggregates::{CartAction, CartItem};
use crate::domain::requests::{CheckoutRequest, UpdateQuantityRequest};
use crate::domain::responses::{CartResponse, OrderPlacedResponse};
use crate::errors::HttpError;
use crate::handler::extract::JsonBody;
use crate::state::AppState;

async fn apply(s: &AppState, session: Uuid, action: CartAction) -> Json<CartResponse> {
    let mut store = CartStore::load(s.cart_storage.clone(), storage_key(session)).await;
    store.dispatch(action).await;
    Json(CartResponse::from(store.cart()))
}

pub async fn get_cart(State(s): State<AppState>, Path(session): Path<Uuid>) -> Json<CartResponse> {
    let store = CartStore::load(s.cart_storage.clone(), storage_key(session)).await;
    Json(CartResponse::from(store.cart()))
}

pub async fn add_item(State(s): State<AppState>, Path(session): Path<Uuid>, JsonBody(item): JsonBody<CartItem>) -> Json<CartResponse> {
    apply(&s, session, CartAction::Add(item)).await
}

pub async fn update_quantity(State(s): State<AppState>, Path((session, variant_id)): Path<(Uuid, i64)>, JsonBody(r): JsonBody<UpdateQuantityRequest>) -> Json<CartResponse> {
    apply(&s, session, CartAction::UpdateQuantity { variant_id, quantity: r.quantity }).await
}

pub async fn remove_item(State(s): State<AppState>, Path((session, variant_id)): Path<(Uuid, i64)>) -> Json<CartResponse> {
    apply(&s, session, CartAction::Remove { variant_id }).await
}

pub async fn clear_cart(State(s): State<AppState>, Path(session): Path<Uuid>) -> StatusCode {
    apply(&s, session, CartAction::Clear).await;
    StatusCode::NO_CONTENT
}

pub async fn checkout(State(s): State<AppState>, Path(session): Path<Uuid>, JsonBody(r): JsonBody<CheckoutRequest>) -> Result<(StatusCode, Json<OrderPlacedResponse>), HttpError> {
    let order_id = s.checkout.checkout(session, r).await?;
    Ok((StatusCode::CREATED, Json(OrderPlacedResponse { order_id })))
}
