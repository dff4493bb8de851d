//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!. Bump the
//! version (add a migration) whenever the index set changes.

/// Migration metadata
pub struct Migration {
    pub version: u32,
    pub id: &'static str,
    pub sql: &'static str,
}

/// Schema version produced by applying every embedded migration
pub const LATEST_VERSION: u32 = 1;

/// Get all embedded migrations in version order
pub fn get_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        id: "001_funcionarios",
        sql: include_str!("../../migrations/001_funcionarios.sql"),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_contiguous_and_end_at_latest() {
        let migrations = get_migrations();
        for (i, m) in migrations.iter().enumerate() {
            assert_eq!(m.version, i as u32 + 1, "gap before {}", m.id);
        }
        assert_eq!(migrations.last().map(|m| m.version), Some(LATEST_VERSION));
    }
}
