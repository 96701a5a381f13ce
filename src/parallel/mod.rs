//! Parallel execution engines
//!
//! Provides a bounded worker-pool map ([`transform`]) and a round-based tree
//! reduction ([`reduce`]) over in-memory sequences.
//!
//! Both engines hand a worker loop to `run_workers`. Up to the host's
//! hardware concurrency the loops run on a rayon pool that is built once per
//! thread count and reused by later calls. Above that, the extra workers are
//! almost always waiting on IO, so each loop gets its own blocking OS thread
//! instead of a spinning pool thread.

mod latch;
mod queue;
mod reduce;
mod transform;

pub use reduce::{reduce, ReduceFn};
pub use transform::{transform, TransformFn};

use crate::error::Error;
use dashmap::DashMap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

lazy_static::lazy_static! {
    /// Pools reused across calls, keyed by thread count
    static ref POOLS: DashMap<usize, Arc<rayon::ThreadPool>> = DashMap::new();
}

/// Builds a pool with exactly `threads` workers.
fn build_pool<E>(threads: usize) -> Result<rayon::ThreadPool, Error<E>> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("toil-worker-{}", i))
        .build()
        .map_err(|e| Error::WorkerPool(e.to_string()))
}

/// Returns the shared pool for `threads`, building it on first use.
fn shared_pool<E>(threads: usize) -> Result<Arc<rayon::ThreadPool>, Error<E>> {
    if let Some(pool) = POOLS.get(&threads) {
        return Ok(Arc::clone(pool.value()));
    }
    debug!(threads, "building shared worker pool");
    let pool = POOLS
        .entry(threads)
        .or_try_insert_with(|| build_pool::<E>(threads).map(Arc::new))?;
    Ok(Arc::clone(pool.value()))
}

/// Largest worker count served from a shared pool
fn pooled_limit() -> usize {
    num_cpus::get().max(1)
}

/// Runs `body` on `count` concurrent workers and blocks until all return.
fn run_workers<E>(count: usize, body: impl Fn() + Sync) -> Result<(), Error<E>> {
    if count <= pooled_limit() {
        let pool = shared_pool::<E>(count)?;
        pool.scope(|s| {
            for _ in 0..count {
                s.spawn(|_| body());
            }
        });
        return Ok(());
    }
    run_on_threads(count, &body)
}

/// One blocking OS thread per worker, for counts beyond the hardware.
fn run_on_threads<E>(count: usize, body: &(impl Fn() + Sync)) -> Result<(), Error<E>> {
    thread::scope(|s| {
        let mut spawned = 0usize;
        for i in 0..count {
            let spawn = thread::Builder::new()
                .name(format!("toil-worker-{}", i))
                .spawn_scoped(s, move || body());
            match spawn {
                Ok(_) => spawned += 1,
                Err(e) if spawned > 0 => {
                    // Workers already running still drain the whole queue
                    warn!(spawned, requested = count, error = %e, "could not spawn every worker");
                    break;
                }
                Err(e) => return Err(Error::WorkerPool(e.to_string())),
            }
        }
        Ok(())
    })
}

/// Runs one user invocation, turning both `Err` and a panic into [`Error`].
fn invoke<T, E>(index: usize, call: impl FnOnce() -> Result<T, E>) -> Result<T, Error<E>> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Error::Task(e)),
        Err(payload) => Err(Error::Panicked {
            index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
