//! Cadastro Store - SQLite persistence for the employee collection
//!
//! Provides:
//! - Connection opening and configuration
//! - Versioned, checksummed schema migrations (`PRAGMA user_version`)
//! - `SqliteRepo`: blocking CRUD and cursor scans over `funcionarios`
//!
//! Everything here is synchronous; the engine crate runs it on the
//! blocking pool.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteRepo;
