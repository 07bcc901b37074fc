//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderCreate, OrderStatistics, OrderStatus, OrderUpdate};

use crate::auth::{CurrentActor, require_permission};
use crate::core::ServerState;
use crate::db::repository::{OrderFilter, OrderRepository};
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult, validation};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<String>,
    pub assigned_to: Option<String>,
    /// Inclusive created_at lower bound (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Inclusive created_at upper bound (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

/// Paginated order listing
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List orders with filters (paginated)
pub async fn list(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ListResponse>> {
    require_permission(&actor, "orders:view")?;

    let filter = OrderFilter {
        status: query.status,
        customer_id: query.customer_id,
        assigned_to: query.assigned_to,
        created_from: query.from,
        created_to: query.to,
        page: query.page,
        per_page: query.per_page,
    };
    let repo = OrderRepository::new(state.pool().clone());
    let items = repo.find_all(&filter).await?;
    let total = repo.count(&filter).await?;
    Ok(Json(ListResponse {
        items,
        total,
        page: query.page,
        per_page: query.per_page,
    }))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    require_permission(&actor, "orders:view")?;
    let repo = OrderRepository::new(state.pool().clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// Create an order (atomic stock reservation)
pub async fn create(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    validation::validate_required_text(&payload.customer_id, "customer_id", MAX_ADDRESS_LEN)?;
    validation::validate_required_text(
        &payload.shipping_address,
        "shipping_address",
        MAX_ADDRESS_LEN,
    )?;
    validation::validate_required_text(
        &payload.billing_address,
        "billing_address",
        MAX_ADDRESS_LEN,
    )?;
    validation::validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let order = state.order_service().create_order(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Patch order fields (addresses, notes, assignment, status)
pub async fn update(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    // Addresses are required fields; a patch may replace but not blank them
    if let Some(v) = &payload.shipping_address {
        validation::validate_required_text(v, "shipping_address", MAX_ADDRESS_LEN)?;
    }
    if let Some(v) = &payload.billing_address {
        validation::validate_required_text(v, "billing_address", MAX_ADDRESS_LEN)?;
    }
    validation::validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    if !state.order_service().update_order(&actor, &id, payload).await? {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    fetch_updated(&state, &id).await
}

/// Delete an order, restoring reserved stock
pub async fn delete(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.order_service().delete_order(&actor, &id).await? {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Transition order status
pub async fn update_status(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    if !state
        .order_service()
        .update_order_status(&actor, &id, payload.status)
        .await?
    {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    fetch_updated(&state, &id).await
}

/// Assignment request
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: String,
}

/// Assign the order to a staff user
pub async fn assign(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<Order>> {
    if !state
        .order_service()
        .assign_order(&actor, &id, &payload.user_id)
        .await?
    {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }
    fetch_updated(&state, &id).await
}

/// Aggregate order statistics
pub async fn statistics(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Json<OrderStatistics>> {
    require_permission(&actor, "reports:view")?;
    let repo = OrderRepository::new(state.pool().clone());
    Ok(Json(repo.statistics().await?))
}

/// Distinct statuses present in the store
pub async fn statuses(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Json<Vec<String>>> {
    require_permission(&actor, "orders:view")?;
    let repo = OrderRepository::new(state.pool().clone());
    Ok(Json(repo.distinct_statuses().await?))
}

async fn fetch_updated(state: &ServerState, id: &str) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.pool().clone());
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}
