//! Error types for Toil engines

use thiserror::Error;

/// Errors surfaced by [`transform`](crate::transform) and [`reduce`](crate::reduce)
///
/// `E` is the caller's own error type. The engines never inspect it, they only
/// detect its presence and hand it back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<E> {
    /// The user function returned an error
    ///
    /// **Triggered by:** `f` returning `Err(e)` for some element or pair
    /// **Note:** Only the first error to reach the latch survives; concurrent
    /// failures from other workers are dropped.
    #[error("{0}")]
    Task(E),

    /// The user function panicked
    ///
    /// **Triggered by:** a panic inside `f`. The panic is caught at the invocation
    /// boundary and routed through the same first-error-wins latch as `Task`.
    /// For a transform, `index` is the element's position in the input. For a
    /// reduction it is the pair's position within the round that failed, so it
    /// only locates the pair inside that round; the round number is emitted on
    /// the `warn!` event recorded alongside the error.
    #[error("Task {index} panicked: {message}")]
    Panicked {
        /// Input index (transform) or in-round pair index (reduce)
        index: usize,
        /// Panic payload, if it was a string
        message: String,
    },

    /// Worker pool could not be created
    #[error("Failed to create worker pool: {0}")]
    WorkerPool(String),
}

impl<E> Error<E> {
    /// Returns the caller's error if this is a [`Error::Task`]
    pub fn task(&self) -> Option<&E> {
        match self {
            Error::Task(e) => Some(e),
            _ => None,
        }
    }

    /// Consumes the error, returning the caller's error if this is a [`Error::Task`]
    pub fn into_task(self) -> Option<E> {
        match self {
            Error::Task(e) => Some(e),
            _ => None,
        }
    }

    /// True if the failing invocation panicked rather than returning an error
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Panicked { .. })
    }
}

/// Failure of a [`transform`](crate::transform) call
///
/// Under fail-fast the partial output is discarded and [`partial`](Self::partial)
/// is `None`. Under the continue policy it holds one slot per input, with
/// `O::default()` wherever the invocation failed. A default value in that vector
/// is indistinguishable from a legitimately default result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError<O, E> {
    error: Error<E>,
    partial: Option<Vec<O>>,
}

impl<O, E> TransformError<O, E> {
    pub(crate) fn new(error: Error<E>, partial: Option<Vec<O>>) -> Self {
        Self { error, partial }
    }

    /// First error latched during the call
    pub fn error(&self) -> &Error<E> {
        &self.error
    }

    /// Output produced before the error was reported, if the policy kept it
    pub fn partial(&self) -> Option<&[O]> {
        self.partial.as_deref()
    }

    /// Drops the partial output and returns the error
    pub fn into_error(self) -> Error<E> {
        self.error
    }

    /// Splits into the latched error and the partial output
    pub fn into_parts(self) -> (Error<E>, Option<Vec<O>>) {
        (self.error, self.partial)
    }
}

impl<O, E: std::fmt::Display> std::fmt::Display for TransformError<O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.error, kept_suffix(&self.partial))
    }
}

impl<O: std::fmt::Debug, E: std::fmt::Debug + std::fmt::Display> std::error::Error
    for TransformError<O, E>
{
}

fn kept_suffix<O>(partial: &Option<Vec<O>>) -> String {
    match partial {
        Some(values) => format!(" ({} partial results kept)", values.len()),
        None => String::new(),
    }
}

impl<O, E> From<TransformError<O, E>> for Error<E> {
    fn from(err: TransformError<O, E>) -> Self {
        err.error
    }
}

/// Result type for Toil operations
pub type Result<T, E> = std::result::Result<T, Error<E>>;
