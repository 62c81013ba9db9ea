//! Authentication module

mod context;
mod extractors;
pub mod jwt;
mod manager;
pub mod middleware;

pub use context::CurrentUser;
pub use extractors::{Admin, Auth, AuthRejection};
pub use jwt::TokenClaims;
pub use manager::{AuthManager, IssuedToken};
pub use middleware::{AuthError, AuthState, require_auth};
