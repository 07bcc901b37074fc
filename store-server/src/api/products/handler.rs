//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::auth::{CurrentActor, require_permission};
use crate::core::ServerState;
use crate::db::repository::ProductRepository;
use crate::inventory::InventoryLedger;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SKU_LEN};
use crate::utils::{AppError, AppResult, validation};

/// Query params for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
    /// Exact SKU lookup; returns zero or one product
    pub sku: Option<String>,
}

/// List products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool().clone());
    if let Some(sku) = &query.sku {
        let products = repo.find_by_sku(sku).await?.into_iter().collect();
        return Ok(Json(products));
    }
    let products = repo.find_all(query.include_inactive).await?;
    Ok(Json(products))
}

/// Get product by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.pool().clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}

/// Create a product
pub async fn create(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_permission(&actor, "products:manage")?;
    validation::validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validation::validate_required_text(&payload.sku, "sku", MAX_SKU_LEN)?;
    validation::validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = ProductRepository::new(state.pool().clone());
    let product = repo.create(payload, Some(&actor.user_id)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
pub async fn update(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    require_permission(&actor, "products:manage")?;
    validation::validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validation::validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = ProductRepository::new(state.pool().clone());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// Soft delete a product
pub async fn delete(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    require_permission(&actor, "products:manage")?;
    let repo = ProductRepository::new(state.pool().clone());
    if !repo.delete(&id).await? {
        return Err(AppError::not_found(format!("Product {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Availability query
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Availability response
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub product_id: String,
    pub quantity: i64,
    pub available: bool,
}

/// Advisory stock check: product exists, is active, and has at least
/// the requested quantity. The answer can be stale by the time an
/// order is placed — creation re-checks under its transaction.
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let ledger = InventoryLedger::new(state.pool().clone());
    let available = ledger.check_availability(&id, query.quantity).await?;
    Ok(Json(AvailabilityResponse {
        product_id: id,
        quantity: query.quantity,
        available,
    }))
}

/// Set stock request
#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub quantity: i64,
}

/// Administrative stock correction (absolute overwrite)
pub async fn set_stock(
    State(state): State<ServerState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    Json(payload): Json<SetStockRequest>,
) -> AppResult<Json<Product>> {
    require_permission(&actor, "products:manage")?;

    let ledger = InventoryLedger::new(state.pool().clone());
    ledger.set_stock(&id, payload.quantity).await?;

    let repo = ProductRepository::new(state.pool().clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(product))
}
