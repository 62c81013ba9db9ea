//! Authenticated request context

use crate::data::types::UserRow;
use crate::domain::Principal;

/// Caller resolved by the auth middleware, stored in request extensions
///
/// Built from a fresh user lookup so role and active status reflect the store,
/// not the token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserRow,
    pub principal: Principal,
}
