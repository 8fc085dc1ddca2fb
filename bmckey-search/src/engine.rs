//! Producer/consumer search over OUI blocks.

use crate::error::{SearchError, SearchResult};
use crate::options::SearchOptions;
use bmckey_net::{MacAddress, Oui};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{debug, info};

/// Number of device addresses behind a single OUI.
pub const CANDIDATES_PER_BLOCK: u64 = 1 << 24;

/// The 256 candidates sharing their first five bytes.
#[derive(Debug, Clone, Copy)]
struct Batch([u8; 5]);

impl Batch {
    fn candidates(self) -> impl Iterator<Item = MacAddress> {
        let [a, b, c, d, e] = self.0;
        (0..=u8::MAX).map(move |last| MacAddress::new([a, b, c, d, e, last]))
    }
}

/// Searches `options.blocks` for an address satisfying `test`.
///
/// Returns the first match any worker publishes. When several addresses
/// satisfy the predicate, which one is returned is unspecified. Worker
/// threads are not joined: after a match they observe the stop flag and exit
/// within one batch, and their results are discarded.
///
/// # Errors
///
/// Returns [`SearchError::NotFound`] if every candidate was rejected, or
/// [`SearchError::Spawn`] if a thread could not be started.
pub fn search<F>(options: &SearchOptions, test: F) -> SearchResult<MacAddress>
where
    F: Fn(&MacAddress) -> bool + Send + Sync + 'static,
{
    if options.blocks.is_empty() {
        return Err(SearchError::NotFound);
    }

    let test = Arc::new(test);
    let stop = Arc::new(AtomicBool::new(false));
    let (work_tx, work_rx) = mpsc::sync_channel::<Batch>(options.queue_depth.max(1));
    let work_rx = Arc::new(Mutex::new(work_rx));
    let (found_tx, found_rx) = mpsc::sync_channel::<MacAddress>(1);

    debug!(
        "starting search over {} block(s) with {} worker(s)",
        options.blocks.len(),
        options.workers
    );

    for &oui in &options.blocks {
        let tx = work_tx.clone();
        let producer_stop = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name(format!("bmckey-produce-{oui}"))
            .spawn(move || produce(oui, &tx, &producer_stop));
        if let Err(e) = spawned {
            stop.store(true, Ordering::SeqCst);
            return Err(e.into());
        }
    }
    drop(work_tx);

    for id in 0..options.workers.max(1) {
        let queue = Arc::clone(&work_rx);
        let test = Arc::clone(&test);
        let found = found_tx.clone();
        let worker_stop = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name(format!("bmckey-worker-{id}"))
            .spawn(move || consume(&queue, &*test, &found, &worker_stop));
        if let Err(e) = spawned {
            stop.store(true, Ordering::SeqCst);
            return Err(e.into());
        }
    }
    drop(found_tx);
    drop(work_rx);

    // Every worker holds a sender, so this only fails once all of them have
    // drained the queue without a match.
    let result = found_rx.recv();
    stop.store(true, Ordering::SeqCst);

    match result {
        Ok(mac) => {
            info!("found matching mac address {mac}");
            Ok(mac)
        }
        Err(_) => Err(SearchError::NotFound),
    }
}

fn produce(oui: Oui, tx: &SyncSender<Batch>, stop: &AtomicBool) {
    debug!("searching mac address block '{oui}'");
    let [a, b, c] = oui.octets();

    for d in 0..=u8::MAX {
        for e in 0..=u8::MAX {
            if stop.load(Ordering::SeqCst) {
                debug!("stopped searching mac address block '{oui}'");
                return;
            }
            // Disconnected means every worker is gone.
            if tx.send(Batch([a, b, c, d, e])).is_err() {
                return;
            }
        }
    }

    debug!("queued every candidate in mac address block '{oui}'");
}

fn consume<F>(
    queue: &Mutex<Receiver<Batch>>,
    test: &F,
    found: &SyncSender<MacAddress>,
    stop: &AtomicBool,
) where
    F: Fn(&MacAddress) -> bool,
{
    loop {
        if stop.load(Ordering::SeqCst) {
            return;
        }

        let batch = {
            let Ok(rx) = queue.lock() else { return };
            match rx.recv() {
                Ok(batch) => batch,
                Err(_) => return,
            }
        };

        for mac in batch.candidates() {
            if test(&mac) {
                // Single slot: the first writer wins and later matches are dropped.
                let _ = found.try_send(mac);
                stop.store(true, Ordering::SeqCst);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_covers_last_byte_in_order() {
        let macs: Vec<MacAddress> = Batch([0x00, 0x25, 0x90, 0x01, 0x02]).candidates().collect();
        assert_eq!(macs.len(), 256);
        assert_eq!(macs[0], MacAddress::new([0x00, 0x25, 0x90, 0x01, 0x02, 0x00]));
        assert_eq!(macs[255], MacAddress::new([0x00, 0x25, 0x90, 0x01, 0x02, 0xff]));
    }
}
