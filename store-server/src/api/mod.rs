//! HTTP API
//!
//! Route assembly; each domain module owns its router and handlers.

pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(orders::router())
        .with_state(state)
}
