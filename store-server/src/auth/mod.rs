//! Actor extraction and capability checks
//!
//! Authentication and role resolution live in the upstream gateway;
//! by the time a request reaches this server its identity and resolved
//! permission set arrive as trusted headers. This module turns them
//! into an [`Actor`] and provides the boundary-level capability check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::Actor;

use crate::utils::AppError;

/// Identity header set by the gateway
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Comma-separated resolved permissions set by the gateway
pub const ACTOR_PERMISSIONS_HEADER: &str = "x-actor-permissions";

/// Extractor wrapping the resolved caller identity
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let permissions = parts
            .headers
            .get(ACTOR_PERMISSIONS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);

        Ok(CurrentActor(Actor::new(user_id, permissions)))
    }
}

/// Boundary capability check for handlers that do not go through the
/// lifecycle service (reads, catalog administration).
pub fn require_permission(actor: &Actor, permission: &str) -> Result<(), AppError> {
    if actor.can(permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "missing permission: {permission}"
        )))
    }
}
