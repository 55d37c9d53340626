#![forbid(unsafe_code)]

//! Data fetch lifecycle and runtime plumbing for gtmdash.
//!
//! - [`fetch`]: the deterministic `FetchLifecycle` state machine.
//! - [`driver`]: `FetchDriver`, which runs a `DataSource` on worker threads
//!   and applies results on the owning thread.
//! - [`poll`]: fixed-interval scheduling and the poller thread.
//! - [`cancellation`]: stop signal shared with background threads.
//! - [`config`]: `DashboardConfig` and its loaders.

pub mod cancellation;
pub mod config;
pub mod driver;
pub mod fetch;
pub mod poll;

pub use cancellation::{CancellationSource, CancellationToken};
pub use config::{ConfigError, DashboardConfig};
pub use driver::{DEFAULT_MAX_PENDING_CALLS, DataSource, FetchDriver, FetchOptions, PumpReport};
pub use fetch::{
    FetchCompletion, FetchError, FetchLifecycle, FetchState, FetchStatus, FetchTicket,
    FetchTrigger,
};
pub use poll::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL, PollSchedule, Poller};
