//! Board domain logic
//!
//! - `permissions` - Board role resolution and view/edit/owner checks
//! - `context` - Child entity -> owning board resolution
//! - `fields` - Custom column definitions and value validation
//! - `activity` - Best-effort audit trail
//! - `credentials` - Password hashing
//! - `services` - Permission-checked operations, one service per resource
//!
//! Every operation takes the acting [`Principal`] explicitly.

pub mod activity;
pub mod context;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod permissions;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::ActivityLog;
pub use context::BoardContextResolver;
pub use error::ServiceError;
pub use permissions::PermissionResolver;
pub use services::Services;

use crate::data::types::UserRole;

/// Authenticated caller of a service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
