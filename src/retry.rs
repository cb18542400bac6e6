//! Retry policy for transient failures.
//!
//! The policy repeats an operation until it succeeds, fails with an error
//! the [`RetryPredicate`] refuses to retry, or the attempt budget runs out.
//! There is no delay between attempts. An optional deadline bounds the
//! whole sequence of attempts, and a [`CancellationToken`] can abort it.

use crate::{CancellationToken, Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Decides whether a failed attempt should be repeated.
///
/// # Examples
///
/// ```
/// use teamcity_rest::{Error, RetryPredicate};
///
/// /// Retries transient errors, but only for the first two attempts.
/// struct FirstTwo;
///
/// impl RetryPredicate for FirstTwo {
///     fn should_retry(&self, error: &Error, attempt: u32) -> bool {
///         error.is_transient() && attempt < 2
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Returns `true` if the operation should run again after `error`.
    ///
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: u32) -> bool;
}

/// Retries exactly the errors that report themselves as transient.
///
/// This is the default predicate. Connection failures and timeouts are
/// retried; HTTP-level and codec errors fail fast.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransient;

impl RetryPredicate for RetryOnTransient {
    fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
        error.is_transient()
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl RetryPredicate for NeverRetry {
    fn should_retry(&self, _error: &Error, _attempt: u32) -> bool {
        false
    }
}

/// How many times, and for how long, an operation is attempted.
///
/// # Examples
///
/// ```
/// use teamcity_rest::{Error, RetryPolicy};
///
/// # async fn example() -> Result<(), Error> {
/// let policy = RetryPolicy::new(3);
/// let value = policy.run(|| async { Ok::<_, Error>(7) }).await?;
/// assert_eq!(value, 7);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    deadline: Option<Duration>,
    predicate: Arc<dyn RetryPredicate>,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts of transient failures.
    ///
    /// A value of `0` or `1` runs the operation exactly once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            deadline: None,
            predicate: Arc::new(RetryOnTransient),
        }
    }

    /// Bounds all attempts together by `deadline`.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Replaces the predicate deciding which errors are retried.
    pub fn with_predicate(mut self, predicate: Arc<dyn RetryPredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    /// The configured attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The configured deadline spanning all attempts.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Runs `op` under this policy.
    ///
    /// Returns the first success, the first error the predicate rejects, or
    /// the last error once the budget is exhausted. Errors are returned
    /// unchanged.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, self.attempts(op)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(deadline_ms = deadline.as_millis(), "Deadline exceeded");
                    Err(Error::DeadlineExceeded { deadline })
                }
            },
            None => self.attempts(op).await,
        }
    }

    /// Runs `op` under this policy until it finishes or `cancel` fires.
    pub async fn run_cancellable<T, F, Fut>(&self, op: F, cancel: &CancellationToken) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Call cancelled");
                Err(Error::Cancelled)
            }
            result = self.run(op) => result,
        }
    }

    async fn attempts<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.max_attempts <= 1 {
            return op().await;
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempts = attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if !self.predicate.should_retry(&e, attempt) {
                        return Err(e);
                    }
                    if attempt >= self.max_attempts {
                        tracing::warn!(
                            error = %e,
                            attempts = attempt,
                            "Retry budget exhausted"
                        );
                        return Err(e);
                    }

                    tracing::warn!(
                        error = %e,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        "Transient failure, retrying"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ATTEMPTS)
    }
}
