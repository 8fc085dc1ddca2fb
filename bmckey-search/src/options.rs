//! Search configuration.

use bmckey_net::{Oui, VENDOR_OUIS};
use std::num::NonZeroUsize;
use std::thread;

/// Batches buffered per worker before producers block.
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Returns the default number of consumer threads: one less than the
/// available parallelism, leaving a core for the producers, and at least one.
#[must_use]
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Configuration for a brute-force search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Number of consumer threads evaluating the predicate.
    pub workers: usize,
    /// Capacity of the shared work queue, in batches of 256 candidates.
    pub queue_depth: usize,
    /// OUI blocks to search. Each block is 16,777,216 candidates.
    pub blocks: Vec<Oui>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let workers = default_workers();
        Self {
            workers,
            queue_depth: workers * QUEUE_DEPTH_PER_WORKER,
            blocks: VENDOR_OUIS.to_vec(),
        }
    }
}

impl SearchOptions {
    /// Sets the worker count. Zero is treated as one.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self.queue_depth = self.workers * QUEUE_DEPTH_PER_WORKER;
        self
    }

    /// Restricts the search to the given blocks.
    #[must_use]
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Oui>) -> Self {
        self.blocks = blocks.into_iter().collect();
        self
    }

    /// Total number of candidates this search would test.
    #[must_use]
    pub fn candidate_count(&self) -> u64 {
        self.blocks.len() as u64 * crate::CANDIDATES_PER_BLOCK
    }
}
