//! Actor — the caller identity at the service boundary
//!
//! Permissions are resolved *before* the request reaches business
//! logic (by the gateway / auth layer, which is outside this system).
//! The lifecycle service receives the resolved set and never queries
//! role tables lazily.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A caller with resolved capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub permissions: HashSet<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, permissions: impl IntoIterator<Item = String>) -> Self {
        Self {
            user_id: user_id.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Check a capability; `*` grants everything
    pub fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission) || self.permissions.contains("*")
    }
}
