//! First-error-wins latch shared by concurrent invocations

use crate::error::Error;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Single-assignment error cell
///
/// The winner is decided by a compare-and-set on `tripped`; only that writer
/// ever touches `slot`, so the mutex is never contended by racing failures.
pub(crate) struct ErrorLatch<E> {
    tripped: AtomicBool,
    slot: Mutex<Option<Error<E>>>,
}

impl<E> ErrorLatch<E> {
    pub(crate) fn new() -> Self {
        Self {
            tripped: AtomicBool::new(false),
            slot: Mutex::new(None),
        }
    }

    /// Records `error` if no error has been recorded yet.
    ///
    /// Returns `true` if this call won the latch; a losing error is dropped.
    pub(crate) fn record(&self, error: Error<E>) -> bool {
        if self
            .tripped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        *self.slot.lock() = Some(error);
        true
    }

    pub(crate) fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Takes the latched error. Call only after every writer has finished.
    pub(crate) fn into_inner(self) -> Option<Error<E>> {
        self.slot.into_inner()
    }
}
