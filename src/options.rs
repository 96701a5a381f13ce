//! Execution options shared by both engines

use serde::{Deserialize, Serialize};

/// Configuration for parallel execution
///
/// `Options` is a plain value: the builder methods consume `self` and return
/// a modified copy, so a configuration handed to one call can never be changed
/// underneath it by another.
///
/// # Example
/// ```
/// use toil::Options;
///
/// let base = Options::new();
/// let strict = base.with_workers(4).with_fail_fast(true);
///
/// assert_eq!(base.workers(), 0);
/// assert_eq!(strict.workers(), 4);
/// assert!(strict.fail_fast());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Worker count; 0 or negative means one per available CPU
    workers: i64,
    /// Stop dispatching on first error vs run every invocation
    fail_fast: bool,
}

impl Options {
    /// Default options: hardware parallelism, continue on error
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of workers
    ///
    /// A value of 0 or below means "use available hardware parallelism",
    /// resolved each time an engine runs rather than here.
    pub fn with_workers(mut self, workers: i64) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the error policy
    ///
    /// With `true`, the first error stops dispatch of any further work and the
    /// partial output is discarded. With `false` (the default), every element is
    /// processed and the first error is reported once all work is done.
    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Configured worker count, as given
    pub fn workers(&self) -> i64 {
        self.workers
    }

    /// Whether the first error stops further dispatch
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Number of workers an engine will actually use (always at least 1)
    pub fn effective_workers(&self) -> usize {
        if self.workers >= 1 {
            usize::try_from(self.workers).unwrap_or(usize::MAX)
        } else {
            num_cpus::get().max(1)
        }
    }
}
