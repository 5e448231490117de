//! Database layer - storage backends and units of work

pub mod memory;
pub mod postgres;
pub mod traits;
pub mod transaction;

pub use memory::{MemoryStore, MemoryUnitOfWork};
pub use postgres::PostgresStore;
pub use traits::{ClinicStore, UnitOfWork};
pub use transaction::PostgresUnitOfWork;
