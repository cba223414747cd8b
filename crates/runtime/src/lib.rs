//! Task Runtime (C9): a durable, at-least-once task execution substrate
//! supporting two composition primitives — `chain` and `group` (spec §4.9).
//!
//! There is no external broker here: the durability and idempotency the
//! spec asks for are delivered by the *data* layer (C3's upserts and
//! "not yet computed" filter, C4's cache-through, C5's skip-empty rule —
//! spec §4.9), not by this runtime persisting task state of its own. What
//! this crate owns is the *scheduling contract*: `chain(a, b)` only invokes
//! `b` once `a` has committed, and `group(tasks)` fans a batch out over a
//! bounded worker pool without letting one peer's failure affect another's
//! (spec §4.6 "Race handling", §5 "Scheduling model").
//!
//! Design Notes §9 calls this out explicitly: "any broker honoring durable
//! FIFO per key suffices" for `chain`, and `group` is "independent
//! fan-out" — a bounded `tokio` worker pool satisfies both without
//! reaching for a message broker this pipeline doesn't otherwise need.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, warn};

/// The coarse concurrency knob from spec §5: "the size of that pool is the
/// coarse knob for total CPU and DB concurrency." Every `group` fan-out (and
/// every `chain` call) acquires a permit before running its body, so total
/// in-flight task work across the whole process never exceeds `workers`.
#[derive(Clone)]
pub struct Runtime {
    permits: Arc<Semaphore>,
}

/// How eagerly a single task is retried before the runtime gives up on it
/// for this run. At-least-once delivery (spec §4.9) means a worker crash
/// mid-task must not lose the task — here that shows up as a bounded retry
/// with a short backoff, since each retried attempt is itself idempotent
/// (the DB-level guarantees hold regardless of how many times a task body
/// actually runs).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1, backoff: Duration::from_millis(0) }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self { max_attempts, backoff }
    }
}

impl Runtime {
    /// `workers` is the OS-worker-pool size from spec §5.
    pub fn new(workers: usize) -> Self {
        Self { permits: Arc::new(Semaphore::new(workers.max(1))) }
    }

    /// `chain(a, b)`: run `a`, and only once it resolves successfully, run
    /// `b` with `a`'s output (spec §4.9). A failing `a` short-circuits `b`
    /// entirely. Both stages share one permit from the worker pool for the
    /// duration of the chain, since the spec frames the whole chain as one
    /// unit of scheduling (§4.5: "a chain message ... scan(cached_ids) →
    /// dispatch(result)").
    pub async fn chain<A, Fut1, T, B, Fut2>(&self, first: A, then: B) -> anyhow::Result<()>
    where
        A: FnOnce() -> Fut1,
        Fut1: Future<Output = anyhow::Result<T>>,
        B: FnOnce(T) -> Fut2,
        Fut2: Future<Output = anyhow::Result<()>>,
    {
        let _permit = self.permits.acquire().await.expect("semaphore is never closed");
        let result = first().await?;
        then(result).await
    }

    /// `group(jobs)`: parallel fan-out bounded by the worker pool. Peers are
    /// fully independent — one job's failure is logged and does not cancel
    /// or fail the others (spec §4.6 Race handling, §9 "group(tasks) ...
    /// independent of ordering and failure mode of peers"). Returns one
    /// outcome per input job, in input order, so callers can still report
    /// per-item results without the fan-out itself being ordered.
    pub async fn group<T: Send + 'static>(
        &self,
        jobs: Vec<BoxFuture<'static, anyhow::Result<T>>>,
    ) -> Vec<Option<T>> {
        let tasks = jobs.into_iter().map(|job| {
            let permits = self.permits.clone();
            tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.expect("semaphore is never closed");
                job.await
            })
        });

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(Ok(value)) => outcomes.push(Some(value)),
                Ok(Err(err)) => {
                    warn!(error = %err, "group member failed, continuing with remaining peers");
                    outcomes.push(None);
                }
                Err(join_err) => {
                    error!(error = %join_err, "group member panicked, continuing with remaining peers");
                    outcomes.push(None);
                }
            }
        }
        outcomes
    }

    /// Runs one task with at-least-once retry semantics. The task body must
    /// be safe to run more than once (spec §4.9); this helper exists for
    /// the transient worker-level failures the task runtime is explicitly
    /// allowed to paper over (a DB connection blip during `scan`/`dispatch`,
    /// say) — not for exchange fetch failures, which spec §4.1/§5 routes to
    /// the *next batch run* instead of an in-run retry.
    pub async fn with_retry<F, Fut, T>(&self, policy: RetryPolicy, mut attempt: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let _permit = self.permits.acquire().await.expect("semaphore is never closed");
        let mut last_err = None;
        for attempt_no in 1..=policy.max_attempts.max(1) {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(attempt = attempt_no, max = policy.max_attempts, error = %err, "task attempt failed");
                    last_err = Some(err);
                    if attempt_no < policy.max_attempts && !policy.backoff.is_zero() {
                        tokio::time::sleep(policy.backoff).await;
                    }
                }
            }
        }
        Err(last_err.expect("loop runs at least once"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn chain_invokes_second_stage_only_after_first_succeeds() {
        let runtime = Runtime::new(4);
        let result = runtime
            .chain(|| async { Ok::<_, anyhow::Error>(21) }, |n| async move { Ok(assert_eq!(n * 2, 42)) })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn chain_short_circuits_on_first_stage_failure() {
        let runtime = Runtime::new(4);
        let second_ran = Arc::new(AtomicUsize::new(0));
        let second_ran_clone = second_ran.clone();
        let result = runtime
            .chain(
                || async { Err::<(), _>(anyhow::anyhow!("boom")) },
                move |_| {
                    second_ran_clone.fetch_add(1, Ordering::SeqCst);
                    async { Ok(()) }
                },
            )
            .await;
        assert!(result.is_err());
        assert_eq!(second_ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn group_isolates_peer_failures() {
        let runtime = Runtime::new(4);
        let jobs: Vec<BoxFuture<'static, anyhow::Result<i32>>> = vec![
            Box::pin(async { Ok(1) }),
            Box::pin(async { Err(anyhow::anyhow!("peer failed")) }),
            Box::pin(async { Ok(3) }),
        ];
        let outcomes = runtime.group(jobs).await;
        assert_eq!(outcomes, vec![Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn with_retry_succeeds_after_transient_failures() {
        let runtime = Runtime::new(4);
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = attempts.clone();
        let result = runtime
            .with_retry(RetryPolicy::new(3, Duration::from_millis(0)), move || {
                let attempts = attempts_clone.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(anyhow::anyhow!("not yet"))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_gives_up_after_max_attempts() {
        let runtime = Runtime::new(4);
        let result = runtime
            .with_retry(RetryPolicy::new(2, Duration::from_millis(0)), || async {
                Err::<(), _>(anyhow::anyhow!("always fails"))
            })
            .await;
        assert!(result.is_err());
    }
}
