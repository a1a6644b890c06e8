use crate::db;
use crate::error::StoreError;
use crate::models::{Book, CoverUpload, NewBook};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The catalog store: one `books` table behind a database path.
///
/// Every operation opens its own connection, runs a single statement in
/// autocommit and drops the connection again. There is no pooling and
/// no cross-call transaction; the catalog belongs to one local user.
pub struct CatalogStore {
    db_path: PathBuf,
    covers_dir: PathBuf,
}

impl CatalogStore {
    /// Set up a store rooted at `db_path`, with uploaded covers kept in
    /// `covers_dir`. Creates both locations on first use.
    pub fn new(db_path: impl Into<PathBuf>, covers_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        let covers_dir = covers_dir.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        // Touch the schema once so later per-call opens are pure reads/writes.
        db::open_db(&db_path)?;

        Ok(CatalogStore { db_path, covers_dir })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(db::open_db(&self.db_path)?)
    }

    /// Insert a new book. Returns the assigned id, or
    /// `StoreError::DuplicateTitle` when the title is already taken.
    pub fn add(&self, book: NewBook, cover: Option<CoverUpload>) -> Result<i64, StoreError> {
        let image_path = match cover {
            Some(upload) => Some(self.save_cover(&upload)?),
            None => None,
        };

        let conn = self.connect()?;
        let created_at = Utc::now().to_rfc3339();
        let result = conn.execute(
            "INSERT INTO books (title, author, year, genre, read, issued, image_path, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
            params![
                book.title,
                book.author,
                book.year,
                book.genre,
                book.read,
                image_path,
                created_at
            ],
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                log::info!("added book id={} title=\"{}\"", id, book.title);
                Ok(id)
            }
            Err(err) => {
                // The insert failed, so an orphaned cover file may be left behind.
                if let Some(path) = image_path {
                    let _ = fs::remove_file(path);
                }
                Err(map_insert_error(err, &book.title))
            }
        }
    }

    /// Delete a book by id, along with its stored cover file if any.
    /// Returns `false` when no such id exists.
    pub fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let image_path: Option<Option<String>> = conn
            .query_row(
                "SELECT image_path FROM books WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(image_path) = image_path else {
            return Ok(false);
        };

        conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        if let Some(path) = image_path {
            if fs::remove_file(&path).is_err() {
                log::warn!("could not delete cover file {}", path);
            }
        }
        log::info!("removed book id={}", id);
        Ok(true)
    }

    /// All books in the catalog, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, author, year, genre, read, issued, image_path, created_at
             FROM books ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                year: row.get(3)?,
                genre: row.get(4)?,
                read: row.get(5)?,
                issued: row.get(6)?,
                image_path: row.get(7)?,
                created_at: parse_timestamp(row.get::<_, String>(8)?),
            })
        })?;

        let mut books = Vec::new();
        for row in rows {
            books.push(row?);
        }
        Ok(books)
    }

    /// Flip the issued flag. Returns `false` when no such id exists;
    /// no other record is touched.
    pub fn set_issued(&self, id: i64, issued: bool) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE books SET issued = ?1 WHERE id = ?2",
            params![issued, id],
        )?;
        Ok(changed > 0)
    }

    /// Flip the read flag, with the same absent-id contract as
    /// `set_issued`.
    pub fn set_read(&self, id: i64, read: bool) -> Result<bool, StoreError> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE books SET read = ?1 WHERE id = ?2",
            params![read, id],
        )?;
        Ok(changed > 0)
    }

    fn save_cover(&self, upload: &CoverUpload) -> Result<String, StoreError> {
        if !self.covers_dir.exists() {
            fs::create_dir_all(&self.covers_dir)?;
        }
        let ext = cover_extension(&upload.file_name);
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let target_path = self.covers_dir.join(&file_name);
        fs::write(&target_path, &upload.bytes)?;
        Ok(target_path.to_string_lossy().to_string())
    }
}

fn map_insert_error(err: rusqlite::Error, title: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::DuplicateTitle(title.to_string())
        }
        _ => StoreError::Db(err),
    }
}

fn cover_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ext == "jpg" || ext == "jpeg" || ext == "png")
        .unwrap_or_else(|| "jpg".to_string())
}

fn parse_timestamp(raw: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|value| value.with_timezone(&Utc))
}
