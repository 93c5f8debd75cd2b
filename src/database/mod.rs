//! Connection pool and schema management.

mod pool;

pub use pool::{create_pool, run_migrations, Database, DatabaseError, MIGRATOR};
