//! Personal library catalog: a single `books` table behind a thin
//! repository, aggregate statistics, a random recommendation and a
//! Google Books metadata lookup.

pub mod db;
pub mod error;
pub mod lookup;
pub mod models;
pub mod recommend;
pub mod stats;
pub mod store;

pub use error::{LookupFailure, StoreError};
pub use lookup::{SearchClient, SearchOutcome};
pub use models::{Book, CoverUpload, NewBook, VolumeHit};
pub use recommend::recommend_unread;
pub use stats::{library_stats, LibraryStats};
pub use store::CatalogStore;
