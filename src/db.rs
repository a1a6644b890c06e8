use rusqlite::{Connection, Result};
use std::path::Path;

const CURRENT_DB_VERSION: u32 = 1;

/// Open the catalog database at `db_path` (created on first use) and
/// make sure the schema exists. The parent directory must already
/// exist; `CatalogStore::new` takes care of that.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT UNIQUE NOT NULL,
            author TEXT NOT NULL,
            year INTEGER NOT NULL,
            genre TEXT NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            issued INTEGER NOT NULL DEFAULT 0,
            image_path TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('db_version', ?1)",
        [CURRENT_DB_VERSION.to_string()],
    )?;

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::open_db;

    #[test]
    fn open_creates_schema_and_is_reentrant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.db");

        let conn = open_db(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        drop(conn);

        // Opening again must not fail or reset anything.
        let conn = open_db(&path).unwrap();
        let version: String = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'db_version'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, "1");
    }
}
