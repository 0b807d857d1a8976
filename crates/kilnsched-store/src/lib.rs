//! # kilnsched-store
//!
//! The `SchedulerStore` persistence contract plus two implementations: an
//! in-memory store for tests and dry runs, and a `rusqlite`-backed store for
//! production use.

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::SchedulerStore;
