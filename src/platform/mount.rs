//! Mount-point lookup with bounded retry
//!
//! The page may still be building its container when the frontend starts, so
//! the lookup is retried a few times with a short pause before giving up.
//! This is the only retry policy in the game.

use std::time::Duration;

use crate::consts::{MOUNT_ATTEMPTS, MOUNT_RETRY_DELAY_MS};
use crate::error::SetupError;

/// Retry policy for locating the rendering container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountRetry {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for MountRetry {
    fn default() -> Self {
        Self {
            max_attempts: MOUNT_ATTEMPTS,
            delay: Duration::from_millis(MOUNT_RETRY_DELAY_MS),
        }
    }
}

impl MountRetry {
    /// Pause before attempt `attempt + 1`, `None` once attempts are exhausted
    ///
    /// `attempt` counts from 1.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then_some(self.delay)
    }

    /// Error reported once every attempt failed
    pub fn exhausted(&self, selector: &str) -> SetupError {
        SetupError::MountPointMissing {
            selector: selector.to_string(),
            attempts: self.max_attempts,
        }
    }

    /// Call `locate` until it yields, awaiting `sleep` between tries
    pub async fn locate<T, F>(
        &self,
        selector: &str,
        mut locate: impl FnMut() -> Option<T>,
        mut sleep: impl FnMut(Duration) -> F,
    ) -> Result<T, SetupError>
    where
        F: Future<Output = ()>,
    {
        let mut attempt = 1;
        loop {
            if let Some(found) = locate() {
                return Ok(found);
            }
            match self.delay_after(attempt) {
                Some(delay) => {
                    log::warn!(
                        "Mount point {} not found (attempt {}/{}), retrying",
                        selector,
                        attempt,
                        self.max_attempts
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    log::error!("Mount point {} not found, giving up", selector);
                    return Err(self.exhausted(selector));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;
    use std::pin::pin;
    use std::task::{Context, Poll, Waker};

    /// Drive a future whose sleeps are always ready
    fn block_on<F: Future>(future: F) -> F::Output {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[test]
    fn test_found_on_third_attempt() {
        let retry = MountRetry::default();
        let mut calls = 0;
        let mut slept = Vec::new();
        let found = block_on(retry.locate(
            ".game-container",
            || {
                calls += 1;
                (calls == 3).then_some("container")
            },
            |d| {
                slept.push(d);
                ready(())
            },
        ))
        .unwrap();
        assert_eq!(found, "container");
        assert_eq!(calls, 3);
        assert_eq!(slept, vec![Duration::from_millis(100); 2]);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let retry = MountRetry {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        };
        let mut calls = 0;
        let err = block_on(retry.locate(
            "#missing",
            || {
                calls += 1;
                None::<()>
            },
            |_| ready(()),
        ))
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(
            err,
            SetupError::MountPointMissing { attempts: 3, ref selector } if selector == "#missing"
        ));
    }

    #[test]
    fn test_delay_after() {
        let retry = MountRetry::default();
        assert_eq!(retry.delay_after(1), Some(Duration::from_millis(100)));
        assert_eq!(retry.delay_after(MOUNT_ATTEMPTS), None);
    }
}
