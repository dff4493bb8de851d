//! Repository layer for persisting employees to SQLite

pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
