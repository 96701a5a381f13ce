//! Shared job queue drained by workers

use parking_lot::Mutex;

/// Hands out the items of an iterator, each to exactly one caller
pub(crate) struct WorkQueue<It> {
    items: Mutex<It>,
}

impl<It: Iterator> WorkQueue<It> {
    pub(crate) fn new(items: It) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub(crate) fn pull(&self) -> Option<It::Item> {
        self.items.lock().next()
    }
}
