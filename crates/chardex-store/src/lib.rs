// SQLite-backed state persistence
// One table, string keys, JSON values - survives restarts, that's the job

pub mod store;

pub use store::{StateStore, StoreError};
