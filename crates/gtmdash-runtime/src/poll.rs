#![forbid(unsafe_code)]

//! Fixed-interval poll scheduling.
//!
//! [`PollSchedule`] is a pure function of a monotonic clock: ticks fall on
//! `start + k * interval`. Missed ticks (the owner was busy, or the host
//! was suspended) are coalesced into one, so a stalled poller never bursts.
//! [`Poller`] runs a schedule on a background thread and invokes a callback
//! per tick until it is stopped.

use std::thread::{self, JoinHandle};

use web_time::{Duration, Instant};

use crate::cancellation::{CancellationSource, CancellationToken};

/// Default poll interval (30 s).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Smallest accepted interval. Shorter requests are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    interval: Duration,
    start: Instant,
    issued: u64,
}

impl PollSchedule {
    #[must_use]
    pub fn new(interval: Duration, start: Instant) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            start,
            issued: 0,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }

    fn elapsed_ticks(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.start).as_nanos();
        let ticks = elapsed / self.interval.as_nanos().max(1);
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Instant of the next tick not yet issued.
    #[must_use]
    pub fn next_deadline(&self) -> Instant {
        let next = u32::try_from(self.issued + 1).unwrap_or(u32::MAX);
        self.start + self.interval.saturating_mul(next)
    }

    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_deadline().saturating_duration_since(now)
    }

    /// Consume every tick due by `now`. Returns whether any was due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        let due = self.elapsed_ticks(now);
        if due > self.issued {
            if due > self.issued + 1 {
                tracing::debug!(
                    target: "gtmdash.fetch",
                    skipped = due - self.issued - 1,
                    "coalesced missed poll ticks"
                );
            }
            self.issued = due;
            true
        } else {
            false
        }
    }
}

/// Background thread driving a [`PollSchedule`].
#[derive(Debug)]
pub struct Poller {
    stop: CancellationSource,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Poller {
    /// Spawn the poll thread. `on_tick` returning `false` ends the loop.
    pub fn spawn<F>(name: &str, interval: Duration, mut on_tick: F) -> std::io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let stop = CancellationSource::new();
        let token = stop.token();
        let mut schedule = PollSchedule::new(interval, Instant::now());
        let interval = schedule.interval();
        let handle = thread::Builder::new()
            .name(format!("gtmdash-poll-{name}"))
            .spawn(move || run_schedule(&mut schedule, &token, &mut on_tick))?;
        Ok(Self {
            stop,
            handle: Some(handle),
            interval,
        })
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancel and join. No tick fires after this returns.
    pub fn stop(&mut self) {
        self.stop.cancel();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!(target: "gtmdash.fetch", "poll thread panicked");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_schedule<F>(schedule: &mut PollSchedule, token: &CancellationToken, on_tick: &mut F)
where
    F: FnMut() -> bool,
{
    loop {
        if token.wait_timeout(schedule.time_until_next(Instant::now())) {
            return;
        }
        if schedule.take_due(Instant::now()) && !on_tick() {
            return;
        }
    }
}
