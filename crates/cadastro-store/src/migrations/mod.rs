//! Migration framework
//!
//! Provides:
//! - Versioned migrations recorded in `PRAGMA user_version`
//! - Checksums of applied migration SQL, verified on every open
//! - Embedded SQL migrations

mod checksums;
mod embedded;
mod runner;

pub use embedded::LATEST_VERSION;
pub use runner::{apply_migrations, apply_migrations_to, current_version};
