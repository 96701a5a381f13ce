//! Round-based tree reduction
//!
//! Each round pairs adjacent elements, hands the pairs to the workers through a
//! shared queue and writes result `k` into slot `k` of a fresh, exactly-sized buffer. An odd
//! trailing element is carried into the last slot unchanged and gets combined
//! in a later round, which is only sound because `f` is associative.

use super::latch::ErrorLatch;
use super::queue::WorkQueue;
use super::{invoke, run_workers};
use crate::error::Result;
use crate::options::Options;
use std::iter;
use tracing::{debug, trace, warn};

/// Boxed combining function accepted by [`reduce`]
pub type ReduceFn<T, E> = Box<dyn Fn(T, T) -> std::result::Result<T, E> + Send + Sync>;

/// Folds `input` into a single value by parallel pairwise combination
///
/// `f` must be associative; it need not be commutative, since pairs are always
/// formed by position. A non-associative `f` still terminates, but its result
/// depends on the bracketing the rounds happen to produce.
///
/// Reduction is always fail-fast: if any pair fails, the pairs already running
/// in that round finish, no further pairs or rounds start, and the first error
/// is returned.
///
/// # Returns
/// * `Ok(T::default())` for empty input
/// * `Ok(x)` for a single element `x`, without calling `f`
/// * `Ok(result)` after combining every element
/// * `Err(Error)` - First error encountered
///
/// # Example
/// ```
/// use toil::{reduce, Options};
///
/// let sum = reduce((1..=10).collect(), |a: i32, b| Ok::<_, String>(a + b), Options::new().with_workers(3))
///     .unwrap();
/// assert_eq!(sum, 55);
/// ```
pub fn reduce<T, E, F>(input: Vec<T>, f: F, options: Options) -> Result<T, E>
where
    T: Send + Default,
    E: Send,
    F: Fn(T, T) -> std::result::Result<T, E> + Sync,
{
    let mut items = input;
    if items.len() <= 1 {
        return Ok(items.pop().unwrap_or_default());
    }

    let workers = options.effective_workers().min(items.len() / 2);
    debug!(len = items.len(), workers, "reduce: starting");

    let mut round = 0usize;
    while items.len() > 1 {
        round += 1;
        items = combine_round(items, &f, round, workers)?;
    }

    Ok(items.pop().unwrap_or_default())
}

/// Runs one round, returning the `ceil(m/2)` elements of the next one
fn combine_round<T, E, F>(items: Vec<T>, f: &F, round: usize, workers: usize) -> Result<Vec<T>, E>
where
    T: Send + Default,
    E: Send,
    F: Fn(T, T) -> std::result::Result<T, E> + Sync,
{
    let len = items.len();
    trace!(round, len, "reduce: combining round");

    let mut next: Vec<T> = iter::repeat_with(T::default).take(len.div_ceil(2)).collect();
    let mut pairs = Vec::with_capacity(len / 2);
    let mut rest = items.into_iter();
    while let Some(a) = rest.next() {
        match rest.next() {
            Some(b) => pairs.push((a, b)),
            None => {
                if let Some(last) = next.last_mut() {
                    *last = a;
                }
            }
        }
    }

    let latch = ErrorLatch::new();
    {
        let workers = workers.min(pairs.len()).max(1);
        let queue = WorkQueue::new(pairs.into_iter().enumerate().zip(next.iter_mut()));
        run_workers::<E>(workers, || {
            while let Some(((index, (a, b)), slot)) = queue.pull() {
                if latch.is_tripped() {
                    return;
                }
                match invoke(index, || f(a, b)) {
                    Ok(value) => *slot = value,
                    Err(error) => {
                        let panicked = error.is_panic();
                        if latch.record(error) {
                            warn!(round, index, panicked, "reduce: first error latched");
                        }
                    }
                }
            }
        })?;
    }

    match latch.into_inner() {
        Some(error) => Err(error),
        None => Ok(next),
    }
}
