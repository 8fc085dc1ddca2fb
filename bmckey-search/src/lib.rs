//! Brute-force MAC address recovery.
//!
//! A product key is bound to the MAC address of a BMC. When that address is
//! unknown it can be recovered by trying every address inside the vendor's
//! OUI blocks against a scheme-specific predicate:
//! - OOB keys: re-encode the candidate and compare
//! - JSON licenses: verify the RSA signature with the candidate
//! - Binary keys: attempt a full decode with the candidate
//!
//! # Design
//!
//! - **Lazy generation**: one producer thread per OUI block feeds a bounded
//!   queue, so the 16M candidates of a block are never materialized
//! - **Worker pool**: `available_parallelism - 1` consumers drain the queue
//! - **First writer wins**: the first match is published to a single-slot
//!   channel and returned immediately; a stop flag winds down the rest

mod engine;
mod error;
mod options;

pub use engine::{search, CANDIDATES_PER_BLOCK};
pub use error::{SearchError, SearchResult};
pub use options::{default_workers, SearchOptions};
