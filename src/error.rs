use thiserror::Error;

/// Failures surfaced by the catalog store. An absent id on remove or
/// update is NOT an error; those operations report it as `Ok(false)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a book titled \"{0}\" is already in the library")]
    DuplicateTitle(String),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classified soft failures of the external metadata lookup. A failed
/// search never escapes as `Err`; it yields an empty hit list plus one
/// of these, rendered inline for the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    #[error("API access forbidden. Check your API key and quota limits.")]
    Forbidden,

    #[error("Too many requests! API rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("API returned unexpected error: {0}")]
    Unexpected(u16),

    #[error("API request timed out! Please try again.")]
    Timeout,

    #[error("Connection error! Check your internet connection.")]
    Connection,

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}
