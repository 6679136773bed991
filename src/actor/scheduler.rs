//! Redraw Scheduler: level-triggered, coalescing redraw requests.
//!
//! Callers that change state send on a channel of depth one. If a request
//! is already pending the new one is merged into it: a pending request
//! means "something changed since the last draw", and one draw covers any
//! number of changes. Sending never blocks, so it is safe from any thread,
//! including the event loop itself.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
struct Counters {
    requested: AtomicU64,
    coalesced: AtomicU64,
}

/// Cloneable sending side of the redraw line.
#[derive(Debug, Clone)]
pub struct RedrawHandle {
    tx: Sender<()>,
    counters: Arc<Counters>,
}

/// Receiving side, owned by the event loop.
#[derive(Debug)]
pub struct RedrawScheduler {
    rx: Receiver<()>,
    counters: Arc<Counters>,
}

/// Create a connected scheduler and handle.
pub fn redraw_channel() -> (RedrawHandle, RedrawScheduler) {
    let (tx, rx) = bounded(1);
    let counters = Arc::new(Counters::default());
    (
        RedrawHandle {
            tx,
            counters: counters.clone(),
        },
        RedrawScheduler { rx, counters },
    )
}

impl RedrawHandle {
    /// Ask for a redraw. Never blocks.
    ///
    /// Returns `false` if the request merged into a pending one or nobody
    /// is listening anymore.
    pub fn request(&self) -> bool {
        self.counters.requested.fetch_add(1, Ordering::Relaxed);
        match self.tx.try_send(()) {
            Ok(()) => true,
            Err(TrySendError::Full(())) => {
                self.counters.coalesced.fetch_add(1, Ordering::Relaxed);
                trace!("redraw already pending; coalesced");
                false
            }
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

impl RedrawScheduler {
    /// The channel to select on.
    pub const fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }

    /// Take the pending request, if any, without waiting.
    pub fn take_pending(&self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Total requests issued so far.
    pub fn requested(&self) -> u64 {
        self.counters.requested.load(Ordering::Relaxed)
    }

    /// Requests merged into an already pending one.
    pub fn coalesced(&self) -> u64 {
        self.counters.coalesced.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_burst_coalesces_to_one() {
        let (handle, scheduler) = redraw_channel();
        assert!(handle.request());
        for _ in 0..100 {
            assert!(!handle.request());
        }

        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
        assert_eq!(scheduler.requested(), 101);
        assert_eq!(scheduler.coalesced(), 100);
    }

    #[test]
    fn test_request_after_drain_is_delivered() {
        let (handle, scheduler) = redraw_channel();
        handle.request();
        assert!(scheduler.take_pending());
        assert!(handle.request());
        assert!(scheduler.take_pending());
    }

    #[test]
    fn test_request_without_listener_does_not_block() {
        let (handle, scheduler) = redraw_channel();
        drop(scheduler);
        assert!(!handle.request());
    }

    #[test]
    fn test_concurrent_requests_never_block() {
        let (handle, scheduler) = redraw_channel();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        handle.request();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(scheduler.requested(), 8000);
        assert!(scheduler.take_pending());
        assert!(!scheduler.take_pending());
    }
}
