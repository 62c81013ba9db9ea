//! API route handlers

pub mod auth;
pub mod boards;
pub mod columns;
pub mod comments;
pub mod health;
pub mod items;
pub mod members;
pub mod sections;
pub mod users;
