use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalogued book as stored in the `books` table.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read: bool,
    pub issued: bool,
    pub image_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the user when adding a book. The id, issued flag
/// and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read: bool,
}

/// An uploaded cover image: the original file name (for its extension)
/// plus the raw bytes.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One search hit from the external metadata lookup, flattened out of
/// the response's `volumeInfo` objects.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VolumeHit {
    pub title: String,
    pub authors: Vec<String>,
    pub info_link: String,
    pub thumbnail: Option<String>,
    pub description: Option<String>,
}
