#![forbid(unsafe_code)]

//! Threaded fetch driver.
//!
//! [`FetchDriver`] pairs a [`FetchLifecycle`] with a [`DataSource`]
//! collaborator. Each accepted request runs the collaborator on a worker
//! thread; the result comes back over an mpsc channel and is applied on the
//! owning thread by [`FetchDriver::pump`]. State is only ever mutated by the
//! owner, so there is a single writer.
//!
//! Collaborator failures, timeouts, and panics all land in
//! [`FetchState::error`](crate::fetch::FetchState::error). Nothing
//! propagates to the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;

use web_time::{Duration, Instant};

use crate::fetch::{FetchCompletion, FetchError, FetchLifecycle, FetchState, FetchStatus, FetchTicket};
use crate::poll::Poller;

/// Remote collaborator producing `T`.
pub trait DataSource<T>: Send + Sync + 'static {
    fn fetch(&self) -> Result<T, FetchError>;
}

impl<T, F> DataSource<T> for F
where
    F: Fn() -> Result<T, FetchError> + Send + Sync + 'static,
{
    fn fetch(&self) -> Result<T, FetchError> {
        self()
    }
}

/// Default for [`FetchOptions::max_pending_calls`].
pub const DEFAULT_MAX_PENDING_CALLS: usize = 4;

/// Driver options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-request timeout. `None` waits indefinitely.
    ///
    /// A timed-out call cannot be interrupted: its thread keeps running
    /// until the collaborator returns, and only its result is discarded.
    pub timeout: Option<Duration>,
    /// Collaborator calls allowed to be running at once, abandoned ones
    /// included. Requests beyond this fail with
    /// [`FetchError::Overloaded`] instead of spawning another thread.
    pub max_pending_calls: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_millis(15_000)),
            max_pending_calls: DEFAULT_MAX_PENDING_CALLS,
        }
    }
}

/// Counts one running collaborator call. Released when the call returns.
struct PendingCall(Arc<AtomicUsize>);

impl PendingCall {
    fn acquire(counter: &Arc<AtomicUsize>, limit: usize) -> Result<Self, usize> {
        counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| {
                (pending < limit).then_some(pending + 1)
            })
            .map(|_| Self(Arc::clone(counter)))
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

enum DriverMessage<T> {
    Completed {
        ticket: FetchTicket,
        result: Result<T, FetchError>,
    },
    PollTick,
}

/// What one [`FetchDriver::pump`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpReport {
    pub applied: usize,
    pub superseded: usize,
    pub poll_ticks: usize,
    pub polls_started: usize,
}

impl PumpReport {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.applied == 0 && self.superseded == 0 && self.poll_ticks == 0
    }
}

/// Owns one fetch call site and its worker/poller threads.
pub struct FetchDriver<T: Send + 'static> {
    name: Arc<str>,
    lifecycle: FetchLifecycle<T>,
    source: Arc<dyn DataSource<T>>,
    options: FetchOptions,
    sender: Sender<DriverMessage<T>>,
    receiver: Receiver<DriverMessage<T>>,
    poller: Option<Poller>,
    pending_calls: Arc<AtomicUsize>,
}

impl<T: Send + 'static> std::fmt::Debug for FetchDriver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchDriver")
            .field("name", &self.name)
            .field("status", &self.lifecycle.status())
            .field("in_flight", &self.lifecycle.in_flight())
            .field("polling", &self.is_polling())
            .finish()
    }
}

impl<T: Send + 'static> FetchDriver<T> {
    pub fn new(name: &str, source: impl DataSource<T>, options: FetchOptions) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name: Arc::from(name),
            lifecycle: FetchLifecycle::new(),
            source: Arc::new(source),
            options,
            sender,
            receiver,
            poller: None,
            pending_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &FetchLifecycle<T> {
        &self.lifecycle
    }

    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        self.lifecycle.state()
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.lifecycle.status()
    }

    #[must_use]
    pub const fn is_retrying(&self) -> bool {
        self.lifecycle.is_retrying()
    }

    #[must_use]
    pub const fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Start the initial load. Returns `false` once disposed.
    pub fn load(&mut self) -> bool {
        let ticket = self.lifecycle.load();
        self.launch(ticket)
    }

    pub fn refetch(&mut self) -> bool {
        let ticket = self.lifecycle.refetch();
        self.launch(ticket)
    }

    /// Retry after an error. Returns `false` (and does nothing) otherwise.
    pub fn retry(&mut self) -> bool {
        let ticket = self.lifecycle.retry();
        self.launch(ticket)
    }

    /// Poll on a fixed interval until [`stop_polling`](Self::stop_polling)
    /// or disposal. Ticks before the first success are skipped. Replaces an
    /// existing poller.
    pub fn start_polling(&mut self, interval: Duration) -> Result<(), FetchError> {
        if self.lifecycle.is_disposed() {
            return Ok(());
        }
        self.stop_polling();
        let sender = self.sender.clone();
        let poller = Poller::spawn(&self.name, interval, move || {
            sender.send(DriverMessage::PollTick).is_ok()
        })
        .map_err(|err| FetchError::Spawn(err.to_string()))?;
        tracing::debug!(
            target: "gtmdash.fetch",
            source = %self.name,
            interval_ms = u64::try_from(poller.interval().as_millis()).unwrap_or(u64::MAX),
            "polling started"
        );
        self.poller = Some(poller);
        Ok(())
    }

    /// Stop and join the poller, if any.
    pub fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
            tracing::debug!(target: "gtmdash.fetch", source = %self.name, "polling stopped");
        }
    }

    /// Apply every pending completion and poll tick without blocking.
    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => self.apply(message, &mut report),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return report,
            }
        }
    }

    /// Block until at least one message arrives or `timeout` elapses, then
    /// drain like [`pump`](Self::pump).
    pub fn pump_timeout(&mut self, timeout: Duration) -> PumpReport {
        let mut report = PumpReport::default();
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => self.apply(message, &mut report),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return report,
        }
        let rest = self.pump();
        PumpReport {
            applied: report.applied + rest.applied,
            superseded: report.superseded + rest.superseded,
            poll_ticks: report.poll_ticks + rest.poll_ticks,
            polls_started: report.polls_started + rest.polls_started,
        }
    }

    /// Pump until no request is in flight or `timeout` elapses. Returns the
    /// final status.
    pub fn wait_settled(&mut self, timeout: Duration) -> FetchStatus {
        let deadline = Instant::now() + timeout;
        while self.lifecycle.in_flight().is_some() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.pump_timeout(deadline - now);
        }
        self.lifecycle.status()
    }

    /// Stop polling, freeze the state, and drop late completions. Idempotent.
    pub fn dispose(&mut self) {
        self.stop_polling();
        self.lifecycle.dispose();
    }

    fn apply(&mut self, message: DriverMessage<T>, report: &mut PumpReport) {
        match message {
            DriverMessage::Completed { ticket, result } => {
                match self.lifecycle.complete(ticket, result) {
                    FetchCompletion::Applied(_) => report.applied += 1,
                    FetchCompletion::Superseded { .. } | FetchCompletion::Disposed => {
                        report.superseded += 1;
                    }
                }
            }
            DriverMessage::PollTick => {
                report.poll_ticks += 1;
                let ticket = self.lifecycle.poll_tick();
                if self.launch(ticket) {
                    report.polls_started += 1;
                }
            }
        }
    }

    fn launch(&mut self, ticket: Option<FetchTicket>) -> bool {
        let Some(ticket) = ticket else {
            return false;
        };
        tracing::debug!(
            target: "gtmdash.fetch",
            source = %self.name,
            generation = ticket.generation,
            trigger = ?ticket.trigger,
            "request started"
        );
        let limit = self.options.max_pending_calls;
        let slot = match PendingCall::acquire(&self.pending_calls, limit) {
            Ok(slot) => slot,
            Err(pending) => {
                tracing::warn!(
                    target: "gtmdash.fetch",
                    source = %self.name,
                    pending,
                    "request refused, earlier calls still pending"
                );
                self.lifecycle
                    .complete(ticket, Err(FetchError::Overloaded { pending }));
                return true;
            }
        };
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let timeout = self.options.timeout;
        let name = Arc::clone(&self.name);
        let spawned = thread::Builder::new()
            .name(format!("gtmdash-fetch-{}", self.name))
            .spawn(move || {
                let result = run_with_timeout(&name, source, timeout, slot);
                // Receiver gone means the driver was dropped.
                let _ = sender.send(DriverMessage::Completed { ticket, result });
            });
        if let Err(err) = spawned {
            self.lifecycle
                .complete(ticket, Err(FetchError::Spawn(err.to_string())));
        }
        true
    }
}

impl<T: Send + 'static> Drop for FetchDriver<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn run_guarded<T: 'static>(name: &str, source: &dyn DataSource<T>) -> Result<T, FetchError> {
    panic::catch_unwind(AssertUnwindSafe(|| source.fetch())).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::warn!(target: "gtmdash.fetch", source = %name, panic = %message, "data source panicked");
        Err(FetchError::Panicked(message))
    })
}

/// `slot` is held by whichever thread runs the collaborator, so an
/// abandoned call keeps counting until it actually returns.
fn run_with_timeout<T: Send + 'static>(
    name: &str,
    source: Arc<dyn DataSource<T>>,
    timeout: Option<Duration>,
    slot: PendingCall,
) -> Result<T, FetchError> {
    let Some(limit) = timeout else {
        let result = run_guarded(name, source.as_ref());
        drop(slot);
        return result;
    };
    let (tx, rx) = mpsc::channel();
    let call_name = name.to_string();
    thread::Builder::new()
        .name(format!("gtmdash-call-{name}"))
        .spawn(move || {
            let result = run_guarded(&call_name, source.as_ref());
            drop(slot);
            let _ = tx.send(result);
        })
        .map_err(|err| FetchError::Spawn(err.to_string()))?;
    match rx.recv_timeout(limit) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            let after_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            tracing::warn!(target: "gtmdash.fetch", source = %name, after_ms, "request timed out");
            Err(FetchError::Timeout { after_ms })
        }
        Err(RecvTimeoutError::Disconnected) => Err(FetchError::Panicked(
            "worker exited without a result".to_string(),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    const SETTLE: Duration = Duration::from_secs(5);

    #[test]
    fn closure_source_success() {
        let mut driver = FetchDriver::new(
            "kpis",
            || -> Result<u32, FetchError> { Ok(42) },
            FetchOptions::default(),
        );
        assert!(driver.load());
        assert_eq!(driver.wait_settled(SETTLE), FetchStatus::Success);
        assert_eq!(driver.state().data(), Some(&42));
    }

    #[test]
    fn panicking_source_becomes_error() {
        let mut driver: FetchDriver<u32> = FetchDriver::new(
            "boom",
            || -> Result<u32, FetchError> { panic!("decoder exploded") },
            FetchOptions {
                timeout: None,
                ..FetchOptions::default()
            },
        );
        driver.load();
        assert_eq!(driver.wait_settled(SETTLE), FetchStatus::Error);
        let message = driver.state().error().expect("error message");
        assert!(message.contains("decoder exploded"), "{message}");
    }

    #[test]
    fn slow_source_times_out() {
        let mut driver = FetchDriver::new(
            "slow",
            || -> Result<u32, FetchError> {
                thread::sleep(Duration::from_millis(500));
                Ok(1)
            },
            FetchOptions {
                timeout: Some(Duration::from_millis(20)),
                ..FetchOptions::default()
            },
        );
        driver.load();
        assert_eq!(driver.wait_settled(SETTLE), FetchStatus::Error);
        assert_eq!(
            driver.state().error(),
            Some("Request timed out after 20 ms")
        );
    }

    #[test]
    fn retry_is_noop_unless_errored() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let mut driver = FetchDriver::new(
            "count",
            move || -> Result<u32, FetchError> { Ok(seen.fetch_add(1, Ordering::SeqCst)) },
            FetchOptions::default(),
        );
        assert!(!driver.retry());
        driver.load();
        driver.wait_settled(SETTLE);
        assert!(!driver.retry());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disposed_driver_ignores_late_completion() {
        let mut driver = FetchDriver::new(
            "late",
            || -> Result<u32, FetchError> {
                thread::sleep(Duration::from_millis(30));
                Ok(5)
            },
            FetchOptions::default(),
        );
        driver.load();
        driver.dispose();
        thread::sleep(Duration::from_millis(80));
        let report = driver.pump();
        assert_eq!(report.applied, 0);
        assert_eq!(driver.status(), FetchStatus::Loading);
        assert!(!driver.load());
    }

    #[test]
    fn hung_calls_are_capped_until_they_return() {
        let (release, gate) = mpsc::channel::<()>();
        let gate = Arc::new(Mutex::new(gate));
        let mut driver = FetchDriver::new(
            "hung",
            move || -> Result<u32, FetchError> {
                // Blocks until the test drops `release`.
                let _ = gate.lock().map(|rx| rx.recv());
                Ok(1)
            },
            FetchOptions {
                timeout: Some(Duration::from_millis(10)),
                max_pending_calls: 2,
            },
        );

        driver.load();
        assert_eq!(driver.wait_settled(SETTLE), FetchStatus::Error);
        driver.refetch();
        assert_eq!(driver.wait_settled(SETTLE), FetchStatus::Error);
        assert_eq!(driver.state().error(), Some("Request timed out after 10 ms"));

        assert!(driver.refetch());
        assert_eq!(driver.status(), FetchStatus::Error);
        assert_eq!(
            driver.state().error(),
            Some("Data source is not responding (2 requests still pending)")
        );

        drop(release);
        let stop = Instant::now() + SETTLE;
        loop {
            driver.refetch();
            if driver.wait_settled(SETTLE) == FetchStatus::Success {
                break;
            }
            assert!(Instant::now() < stop, "pending calls never drained");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(driver.state().data(), Some(&1));
    }

    struct WarnCapture(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor(Option<String>);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                let mut visitor = MessageVisitor(None);
                event.record(&mut visitor);
                self.0.lock().unwrap().extend(visitor.0);
            }
        }
    }

    #[test]
    fn panic_without_timeout_is_logged_at_warn() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = Arc::new(Mutex::new(Vec::new()));
        let subscriber =
            tracing_subscriber::registry().with(WarnCapture(Arc::clone(&warnings)));
        let source = || -> Result<u32, FetchError> { panic!("decoder exploded") };
        let result =
            tracing::subscriber::with_default(subscriber, || run_guarded::<u32>("boom", &source));

        assert_eq!(
            result,
            Err(FetchError::Panicked("decoder exploded".to_string()))
        );
        assert_eq!(*warnings.lock().unwrap(), vec!["data source panicked".to_string()]);
    }
}
