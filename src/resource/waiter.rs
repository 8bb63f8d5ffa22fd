//! Status polling
//!
//! Lifecycle state machines live server-side. The client can only re-read a
//! resource until its status matches, with a fixed sleep between reads and an
//! overall time budget.

use crate::ecl::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Statuses like `error`, `ERROR` or `error_deleting` end a wait as a failure
pub fn is_failure_status(status: &str) -> bool {
    let status = status.to_ascii_lowercase();
    status == "error" || status.starts_with("error_")
}

/// Budget and cadence of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOpts {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitOpts {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn from_secs(timeout_secs: u64, interval_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(timeout_secs),
            Duration::from_secs(interval_secs),
        )
    }
}

impl Default for WaitOpts {
    fn default() -> Self {
        Self::from_secs(600, 3)
    }
}

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Ready,
    /// Not there yet; carries what was observed
    Pending(String),
}

/// Call `probe` until it reports [`Probe::Ready`] or the budget runs out
///
/// A probe error aborts the wait immediately.
pub async fn wait_for<F, Fut>(opts: WaitOpts, target: &str, mut probe: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe>>,
{
    let start = Instant::now();

    loop {
        let last = match probe().await? {
            Probe::Ready => return Ok(()),
            Probe::Pending(last) => last,
        };

        let elapsed = start.elapsed();
        if elapsed >= opts.timeout {
            return Err(Error::Timeout {
                target: target.to_string(),
                last,
                elapsed_secs: elapsed.as_secs(),
            });
        }

        tracing::debug!("Waiting for {}: currently {}", target, last);
        tokio::time::sleep(opts.interval.min(opts.timeout - elapsed)).await;
    }
}

/// Re-read a status until it equals `target`
pub async fn wait_for_status<F, Fut>(opts: WaitOpts, target: &str, mut fetch: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    wait_for(opts, target, || {
        let observed = fetch();
        async move {
            let status = observed.await?;
            if status == target {
                Ok(Probe::Ready)
            } else if is_failure_status(&status) {
                Err(Error::FailedStatus {
                    status,
                    target: target.to_string(),
                })
            } else {
                Ok(Probe::Pending(status))
            }
        }
    })
    .await
}

/// Re-read a resource until the API reports it missing
pub async fn wait_for_deletion<F, Fut>(opts: WaitOpts, mut fetch: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    const TARGET: &str = "deleted";

    wait_for(opts, TARGET, || {
        let observed = fetch();
        async move {
            match observed.await {
                Ok(status) if is_failure_status(&status) => {
                    Err(Error::FailedStatus {
                        status,
                        target: TARGET.to_string(),
                    })
                },
                Ok(status) => Ok(Probe::Pending(status)),
                Err(err) if err.is_not_found() => Ok(Probe::Ready),
                Err(err) => Err(err),
            }
        }
    })
    .await
}
