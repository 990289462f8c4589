//! Request policy: timeout around retry with exponential backoff
//!
//! Every service call is driven through [`RequestPolicy::execute`]:
//!
//! 1. The operation runs on a spawned task, retried up to `max_attempts`
//!    times while its error is retryable, sleeping `backoff_base * 2^n`
//!    before retry `n`.
//! 2. The caller waits at most `timeout` for the whole retry loop. When the
//!    timer wins the caller gets [`ServiceError::Timeout`]; the spawned task
//!    is detached, not aborted, and finishes on its own.

use crate::error::{Action, ServiceError};
use bizplan_model::RecordKind;
use std::future::Future;
use std::time::Duration;

/// Timeout and retry settings applied to a service call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    timeout: Duration,
    max_attempts: u32,
    backoff_base: Duration,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), 3, Duration::from_secs(1))
    }
}

impl RequestPolicy {
    /// Create a policy
    #[inline]
    #[must_use]
    pub fn new(timeout: Duration, max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            timeout,
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Overall timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Attempts including the first
    #[inline]
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `retry` (0-based)
    #[inline]
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_base.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `op` with retry, bounded by the timeout
    ///
    /// # Errors
    /// - `ServiceError::Timeout` when the retry loop outlives the timeout
    /// - `ServiceError::Internal` when the task running the loop panics
    /// - otherwise the error of the last attempt, unchanged
    pub async fn execute<T, F, Fut>(
        &self,
        kind: RecordKind,
        action: Action,
        op: F,
    ) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ServiceError>> + Send + 'static,
    {
        let policy = *self;
        let task = tokio::spawn(async move { policy.retry(kind, action, op).await });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ServiceError::Internal {
                kind,
                action,
                reason: join_err.to_string(),
            }),
            Err(_) => {
                tracing::warn!(
                    kind = %kind,
                    action = %action,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "request timed out; operation left running"
                );
                Err(ServiceError::Timeout {
                    kind,
                    action,
                    after: self.timeout,
                })
            }
        }
    }

    /// Run `op` until it succeeds, fails permanently or runs out of attempts
    ///
    /// # Errors
    /// Returns the error of the last attempt.
    pub async fn retry<T, F, Fut>(
        &self,
        kind: RecordKind,
        action: Action,
        mut op: F,
    ) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && retry + 1 < self.max_attempts => {
                    let delay = self.backoff(retry);
                    tracing::warn!(
                        kind = %kind,
                        action = %action,
                        attempt = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        "attempt failed, retrying: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    type Attempt = Pin<Box<dyn Future<Output = Result<u32, ServiceError>> + Send>>;

    fn flaky(failures: u32, counter: Arc<AtomicU32>) -> impl FnMut() -> Attempt + Send + 'static {
        move || {
            let counter = counter.clone();
            Box::pin(async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(ServiceError::EmptyCollection {
                        kind: RecordKind::Project,
                    })
                } else {
                    Ok(n)
                }
            })
        }
    }

    #[test]
    fn backoff_doubles() {
        let policy = RequestPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn zero_attempts_clamped_to_one() {
        let policy = RequestPolicy::new(Duration::from_secs(1), 0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures_with_backoff() {
        let counter = Arc::new(AtomicU32::new(0));
        let start = Instant::now();
        let result = RequestPolicy::default()
            .execute(RecordKind::Project, Action::LoadAll, flaky(2, counter.clone()))
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        // 1s + 2s of backoff
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn last_error_propagates_after_final_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let result = RequestPolicy::default()
            .execute(RecordKind::Project, Action::LoadAll, flaky(10, counter.clone()))
            .await;

        assert_eq!(
            result,
            Err(ServiceError::EmptyCollection {
                kind: RecordKind::Project
            })
        );
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        let result: Result<(), _> = RequestPolicy::default()
            .execute(RecordKind::Project, Action::Load, move || {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Err(ServiceError::NotFound {
                        kind: RecordKind::Project,
                        id: 7,
                    })
                }
            })
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_wins_and_work_keeps_running() {
        let finished = Arc::new(AtomicU32::new(0));
        let flag = finished.clone();
        let policy = RequestPolicy::new(Duration::from_secs(10), 3, Duration::from_secs(1));

        let result: Result<(), _> = policy
            .execute(RecordKind::Project, Action::Update, move || {
                let flag = flag.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(15)).await;
                    flag.store(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(!err.is_not_found());
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_operation_is_internal() {
        let result: Result<(), _> = RequestPolicy::default()
            .execute(RecordKind::Template, Action::Load, || async {
                let fixture: Option<()> = None;
                fixture.expect("fixture corrupted");
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Internal { .. })));
    }
}
