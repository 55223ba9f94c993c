//! Allocation ledger: every block the fake server hands out is registered
//! here and checked off on release, so tests can assert that a scenario
//! leaks nothing and that nothing is freed twice or used after free.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks the native blocks a fake server currently owns.
#[derive(Default)]
pub struct Ledger {
    live: Mutex<HashMap<usize, &'static str>>,
    allocated: AtomicUsize,
    released: AtomicUsize,
}

impl Ledger {
    /// Records a freshly allocated block of the given kind.
    ///
    /// # Panics
    ///
    /// Panics when the address is already live, which would mean the fake
    /// handed out the same block twice.
    pub fn register(&self, ptr: *const (), kind: &'static str) {
        let previous = self.live.lock().insert(ptr as usize, kind);
        assert!(
            previous.is_none(),
            "{kind} block {ptr:p} allocated while already live"
        );
        self.allocated.fetch_add(1, Ordering::SeqCst);
    }

    /// Checks off a released block.
    ///
    /// # Panics
    ///
    /// Panics on a double free (the address is not live) or on a kind
    /// mismatch (the block is being released through the wrong entry point).
    pub fn release(&self, ptr: *const (), kind: &'static str) {
        match self.live.lock().remove(&(ptr as usize)) {
            Some(live_kind) => assert_eq!(
                live_kind, kind,
                "block {ptr:p} allocated as {live_kind} but released as {kind}"
            ),
            None => panic!("{kind} block {ptr:p} released while not live (double free?)"),
        }
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether the address is a currently live block.
    #[must_use]
    pub fn is_live(&self, ptr: *const ()) -> bool {
        self.live.lock().contains_key(&(ptr as usize))
    }

    /// Number of blocks allocated and not yet released.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.lock().len()
    }

    /// Total number of blocks handed out.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::SeqCst)
    }

    /// Total number of blocks checked off.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}
