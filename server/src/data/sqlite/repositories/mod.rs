//! SQLite repositories
//!
//! One module per table. Types (BoardRow, ItemRow, etc.) are imported from
//! `crate::data::types`.

pub mod activity;
pub mod board;
pub mod column;
pub mod comment;
pub mod context;
pub mod item;
pub mod item_value;
pub mod membership;
pub mod section;
pub mod user;
