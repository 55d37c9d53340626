//! Stop signal shared between a driver and its background threads.
//!
//! [`CancellationSource`] is held by the owner. Each [`CancellationToken`]
//! observes it and can block on [`CancellationToken::wait_timeout`], which
//! wakes immediately when the owner cancels. Background loops use this
//! instead of `thread::sleep`, so teardown never waits out a full interval.

#![forbid(unsafe_code)]

use std::sync::{Arc, Condvar, Mutex};
use web_time::{Duration, Instant};

#[derive(Debug, Default)]
struct Shared {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Owner side. Dropping it does not cancel.
#[derive(Debug, Default)]
pub struct CancellationSource {
    shared: Arc<Shared>,
}

/// Observer side, cloneable across threads.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Cancel and wake every waiting token. Idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self
            .shared
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cancelled = true;
        self.shared.wake.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token().is_cancelled()
    }
}

impl CancellationToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self
            .shared
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Block for at most `duration`. Returns `true` if cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut cancelled = self
            .shared
            .cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .shared
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            cancelled = guard;
        }
        true
    }
}
