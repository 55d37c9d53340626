#![forbid(unsafe_code)]

//! Deterministic fetch lifecycle state machine.
//!
//! [`FetchLifecycle`] tracks one remote call site: its [`FetchState`], the
//! ticket of the request currently in flight, and disposal. It performs no
//! I/O. Callers start a request by asking for a [`FetchTicket`], run the
//! collaborator however they like, and hand the result back through
//! [`FetchLifecycle::complete`].
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Success ──refetch/poll──▶ Loading
//!                   │                                        │
//!                   └──err──▶ Error ──retry──▶ Retrying ──ok─┘─▶ Success
//!                               ▲                 │
//!                               └──────err────────┘
//! ```
//!
//! # Supersession
//!
//! Latest call wins. Every accepted `load`/`refetch`/`retry`/poll tick mints
//! a new generation. A completion carrying an older generation is discarded,
//! whatever order completions arrive in.
//!
//! # Disposal
//!
//! After [`FetchLifecycle::dispose`] no call starts a request and every
//! completion is dropped, so the state is frozen.

use std::fmt;

/// Externally visible lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
    Retrying,
}

impl FetchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
            Self::Retrying => "retrying",
        }
    }

    /// `Loading` or `Retrying`.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Loading | Self::Retrying)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a remote call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or transport failure.
    Transport(String),
    /// The response could not be decoded into the expected shape.
    Decode(String),
    /// The request exceeded the configured timeout.
    Timeout { after_ms: u64 },
    /// The collaborator panicked.
    Panicked(String),
    /// The worker thread could not be started.
    Spawn(String),
    /// Too many earlier calls are still running past their timeout.
    Overloaded { pending: usize },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blank = |message: &str| message.trim().is_empty();
        match self {
            Self::Transport(message) if blank(message) => f.write_str("Network request failed"),
            Self::Transport(message) => write!(f, "Network request failed: {message}"),
            Self::Decode(message) if blank(message) => f.write_str("Unexpected response"),
            Self::Decode(message) => write!(f, "Unexpected response: {message}"),
            Self::Timeout { after_ms } => write!(f, "Request timed out after {after_ms} ms"),
            Self::Panicked(message) => write!(f, "Data source failed unexpectedly: {message}"),
            Self::Spawn(message) => write!(f, "Could not start request: {message}"),
            Self::Overloaded { pending } => {
                write!(f, "Data source is not responding ({pending} requests still pending)")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Observable fetch state.
///
/// `data` is `Some` only in [`FetchStatus::Success`] and `error` is `Some`
/// only in [`FetchStatus::Error`]. Fields are private so that holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    status: FetchStatus,
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Human-readable failure message. Never empty when present.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn pending(status: FetchStatus) -> Self {
        Self {
            status,
            data: None,
            error: None,
        }
    }

    fn success(data: T) -> Self {
        Self {
            status: FetchStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: &FetchError) -> Self {
        Self {
            status: FetchStatus::Error,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// What started a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchTrigger {
    Load,
    Refetch,
    Retry,
    Poll,
}

/// Handle for one started request. Completions must present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub trigger: FetchTrigger,
}

/// Result of handing a completion back to the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCompletion {
    /// The completion was authoritative and moved the state to `status`.
    Applied(FetchStatus),
    /// A newer request superseded this one. State unchanged.
    Superseded { current: Option<u64> },
    /// The lifecycle was disposed. State unchanged.
    Disposed,
}

/// State machine for one fetch call site.
#[derive(Debug, Clone)]
pub struct FetchLifecycle<T> {
    state: FetchState<T>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    last_success: Option<u64>,
    attempts: u64,
    disposed: bool,
}

impl<T> Default for FetchLifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchLifecycle<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FetchState::default(),
            generation: 0,
            in_flight: None,
            last_success: None,
            attempts: 0,
            disposed: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.state.status
    }

    /// Distinguishes error recovery from an ordinary load.
    #[must_use]
    pub const fn is_retrying(&self) -> bool {
        matches!(self.state.status, FetchStatus::Retrying)
    }

    #[must_use]
    pub const fn has_loaded_once(&self) -> bool {
        self.last_success.is_some()
    }

    /// Generation of the most recent successful completion.
    #[must_use]
    pub const fn last_updated(&self) -> Option<u64> {
        self.last_success
    }

    /// Requests started over the lifetime of this call site.
    #[must_use]
    pub const fn attempts(&self) -> u64 {
        self.attempts
    }

    #[must_use]
    pub const fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Start a request. Supersedes any request in flight.
    pub fn load(&mut self) -> Option<FetchTicket> {
        self.start(FetchTrigger::Load, FetchStatus::Loading)
    }

    /// Reload after a success (or from any other state). Enters `Loading`,
    /// never `Retrying`.
    pub fn refetch(&mut self) -> Option<FetchTicket> {
        self.start(FetchTrigger::Refetch, FetchStatus::Loading)
    }

    /// Recover from `Error`. A no-op in every other state.
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if self.state.status != FetchStatus::Error {
            tracing::debug!(
                target: "gtmdash.fetch",
                status = %self.state.status,
                "retry ignored outside error state"
            );
            return None;
        }
        self.start(FetchTrigger::Retry, FetchStatus::Retrying)
    }

    /// Interval tick. Ignored before the first success and while a request
    /// is in flight, so a slow request is never starved by its own poller.
    pub fn poll_tick(&mut self) -> Option<FetchTicket> {
        if !self.has_loaded_once() || self.in_flight.is_some() {
            tracing::debug!(
                target: "gtmdash.fetch",
                loaded_once = self.has_loaded_once(),
                in_flight = self.in_flight.is_some(),
                "poll tick skipped"
            );
            return None;
        }
        self.start(FetchTrigger::Poll, FetchStatus::Loading)
    }

    /// Apply a completion for `ticket`.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<T, FetchError>) -> FetchCompletion {
        if self.disposed {
            tracing::debug!(
                target: "gtmdash.fetch",
                generation = ticket.generation,
                "completion dropped after dispose"
            );
            return FetchCompletion::Disposed;
        }
        if self.in_flight != Some(ticket) {
            tracing::debug!(
                target: "gtmdash.fetch",
                generation = ticket.generation,
                current = self.in_flight.map(|t| t.generation),
                "superseded completion discarded"
            );
            return FetchCompletion::Superseded {
                current: self.in_flight.map(|t| t.generation),
            };
        }
        self.in_flight = None;
        self.state = match result {
            Ok(data) => {
                self.last_success = Some(ticket.generation);
                FetchState::success(data)
            }
            Err(error) => {
                tracing::debug!(
                    target: "gtmdash.fetch",
                    generation = ticket.generation,
                    trigger = ?ticket.trigger,
                    error = %error,
                    "fetch failed"
                );
                FetchState::failure(&error)
            }
        };
        FetchCompletion::Applied(self.state.status)
    }

    /// Freeze the lifecycle. Idempotent.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.in_flight = None;
            tracing::debug!(target: "gtmdash.fetch", "lifecycle disposed");
        }
    }

    fn start(&mut self, trigger: FetchTrigger, status: FetchStatus) -> Option<FetchTicket> {
        if self.disposed {
            return None;
        }
        self.generation += 1;
        self.attempts += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            trigger,
        };
        if let Some(previous) = self.in_flight.replace(ticket) {
            tracing::debug!(
                target: "gtmdash.fetch",
                superseded = previous.generation,
                generation = ticket.generation,
                "request superseded"
            );
        }
        self.state = FetchState::pending(status);
        Some(ticket)
    }
}
