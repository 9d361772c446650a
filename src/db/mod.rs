//! Database module with range queries and migrations.
mod migrations;
mod range;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

// Re-export all public functions
pub use range::{
    clear_ranges, create_range, delete_range, insert_range_if_absent, query_range_by_id,
    query_ranges,
};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./calmonger.db` when no data dir is found.
pub fn default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join("calmonger");
        std::fs::create_dir_all(&app_dir).ok();
        app_dir.join("calmonger.db")
    } else {
        PathBuf::from("calmonger.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RangeQuery;

    #[test]
    fn test_init_creates_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.db");
        {
            let conn = init(&path).unwrap();
            assert!(query_ranges(RangeQuery::All, &conn).unwrap().is_empty());
        }
        assert!(path.exists());
        // Reopening an existing store must not fail on the schema step.
        init(&path).unwrap();
    }
}
