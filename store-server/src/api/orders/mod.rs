//! Order API module
//!
//! All mutations go through the order lifecycle service; reads hit the
//! repository directly.

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/statistics", get(handler::statistics))
        .route("/statuses", get(handler::statuses))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/assign", patch(handler::assign))
}
