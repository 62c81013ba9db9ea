//! Data storage layer
//!
//! - `sqlite` - Embedded transactional store (schema, migrations, repositories)
//! - `ordering` - Dense-rank arithmetic shared by every ordered collection
//! - `types` - Row and enum types returned by repositories
//! - `traits` - The `TransactionalRepository` seam used by domain services
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod ordering;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use sqlite::SqliteService;
pub use traits::TransactionalRepository;
