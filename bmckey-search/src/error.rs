//! Error types for the search engine.

use thiserror::Error;

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during a brute-force search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Every candidate was tried and none satisfied the predicate.
    #[error("could not find a matching mac address")]
    NotFound,

    /// A producer or worker thread could not be started.
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),
}
