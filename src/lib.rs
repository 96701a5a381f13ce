//! # Toil - Bounded Parallel Transform and Reduce
//!
//! A small data-parallel execution library with two primitives over an
//! in-memory, ordered sequence:
//!
//! - [`transform`] - applies a function to every element on a fixed pool of
//!   workers and returns the results in input order
//! - [`reduce`] - folds a sequence with an associative binary function by
//!   combining adjacent pairs in parallel rounds
//!
//! Both run synchronously: the calling thread blocks until the work is done.
//!
//! ## Quick Start
//!
//! ```rust
//! use toil::{reduce, transform, Options};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = Options::new().with_workers(4);
//!
//! let squares = transform((1..=5).collect(), |x: u64| Ok::<_, String>(x * x), opts)?;
//! assert_eq!(squares, vec![1, 4, 9, 16, 25]);
//!
//! let total = reduce(squares, |a, b| Ok::<_, String>(a + b), opts)?;
//! assert_eq!(total, 55);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Policy
//!
//! [`Options::with_fail_fast`] selects how [`transform`] reacts to errors:
//!
//! - **fail-fast** - the first error stops dispatch of further elements and the
//!   partial output is discarded
//! - **continue** (default) - every element is processed; the first error is
//!   returned together with the full output, where failed positions hold
//!   `O::default()`
//!
//! ```rust
//! use toil::{transform, Options};
//!
//! let result = transform(
//!     vec![1, 2, 3, 4, 5],
//!     |x: i32| if x % 2 == 0 { Err("even") } else { Ok(x * 2) },
//!     Options::new().with_workers(2),
//! );
//!
//! let err = result.unwrap_err();
//! assert_eq!(err.partial(), Some(&[2, 0, 6, 0, 10][..]));
//! ```
//!
//! [`reduce`] is always fail-fast. Whatever the policy, a call reports at most
//! one error: the first one to reach the latch. When several invocations fail
//! concurrently, which one that is is not specified.
//!
//! ## Caveats
//!
//! - In-flight invocations are never interrupted. Fail-fast only stops new
//!   dispatch, and a function that never returns stalls the whole call.
//! - A panic inside the user function is caught and reported as
//!   [`Error::Panicked`] instead of unwinding into the caller.
//! - The function passed to [`reduce`] must be associative. Commutativity is
//!   not required.

pub mod error;
pub mod options;
pub mod parallel;

pub use error::{Error, Result, TransformError};
pub use options::Options;
pub use parallel::{reduce, transform, ReduceFn, TransformFn};

/// Version of the Toil library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
