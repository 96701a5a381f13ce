//! Bounded worker-pool map
//!
//! A fixed set of workers pulls jobs from a shared queue. Each job owns an
//! exclusive borrow of its destination slot in the pre-sized output buffer,
//! so results land in input order without any lock on the buffer itself.

use super::latch::ErrorLatch;
use super::queue::WorkQueue;
use super::{invoke, run_workers};
use crate::error::TransformError;
use crate::options::Options;
use std::iter;
use tracing::{debug, warn};

/// Boxed element-wise function accepted by [`transform`]
pub type TransformFn<I, O, E> = Box<dyn Fn(I) -> Result<O, E> + Send + Sync>;

/// One unit of dispatched work
struct Job<'a, I, O> {
    value: I,
    index: usize,
    slot: &'a mut O,
}

/// Applies `f` to every element of `input` in parallel, preserving order
///
/// At most [`Options::effective_workers`] invocations of `f` run at once. The
/// call blocks until every dispatched job has finished.
///
/// # Returns
/// * `Ok(Vec<O>)` - One output per input, in input order
/// * `Err(TransformError)` - First error encountered. Under fail-fast the
///   partial output is discarded; otherwise it is kept, with `O::default()`
///   at each failed index.
///
/// # Example
/// ```
/// use toil::{transform, Options};
///
/// let doubled = transform(vec![1, 2, 3, 4, 5], |x: i32| Ok::<_, String>(x * 2), Options::new().with_workers(2))
///     .unwrap();
/// assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
/// ```
pub fn transform<I, O, E, F>(
    input: Vec<I>,
    f: F,
    options: Options,
) -> Result<Vec<O>, TransformError<O, E>>
where
    I: Send,
    O: Send + Default,
    E: Send,
    F: Fn(I) -> Result<O, E> + Sync,
{
    let len = input.len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let workers = options.effective_workers().min(len);
    let fail_fast = options.fail_fast();
    debug!(len, workers, fail_fast, "transform: dispatching jobs");

    let mut results: Vec<O> = iter::repeat_with(O::default).take(len).collect();
    let latch = ErrorLatch::new();

    {
        // Every pull hands out a distinct input and output slot
        let queue = WorkQueue::new(
            input
                .into_iter()
                .enumerate()
                .zip(results.iter_mut())
                .map(|((index, value), slot)| Job { value, index, slot }),
        );
        run_workers(workers, || drain(&queue, &f, &latch, fail_fast))
            .map_err(|e| TransformError::<O, E>::new(e, None))?;
    }

    match latch.into_inner() {
        None => Ok(results),
        Some(error) if fail_fast => Err(TransformError::new(error, None)),
        Some(error) => Err(TransformError::new(error, Some(results))),
    }
}

/// Worker loop: pull, invoke, write, until the queue is empty
fn drain<'a, I, O, E, F, It>(queue: &WorkQueue<It>, f: &F, latch: &ErrorLatch<E>, fail_fast: bool)
where
    I: 'a,
    O: 'a,
    It: Iterator<Item = Job<'a, I, O>>,
    F: Fn(I) -> Result<O, E>,
{
    while let Some(Job { value, index, slot }) = queue.pull() {
        if fail_fast && latch.is_tripped() {
            debug!(index, "transform: error latched, worker stopping");
            return;
        }
        match invoke(index, || f(value)) {
            Ok(output) => *slot = output,
            Err(error) => {
                let panicked = error.is_panic();
                if latch.record(error) {
                    warn!(index, panicked, "transform: first error latched");
                }
            }
        }
    }
}
