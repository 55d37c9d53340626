#![forbid(unsafe_code)]

//! gtmdash public facade crate.
//!
//! Re-exports the metric, layout, and runtime crates, adds the session
//! object and the composed [`MetricsWorkspace`], and offers a prelude for
//! host code.

pub mod dashboard;
pub mod error;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod session;

// --- Metrics re-exports ----------------------------------------------------

pub use gtmdash_metrics::{
    Annotation, ConfidenceBadge, DataSourceStatus, FunnelStage, KpiBundle, MetricRecord,
    MetricUnit, MetricValue, NOT_AVAILABLE, Polarity, ProvenanceTag, Trend, annotate,
    format_delta, format_value,
};

// --- Layout re-exports -----------------------------------------------------

pub use gtmdash_layout::{
    ListenerCommand, PaneBounds, PaneCancelReason, PaneId, PanePointerButton,
    PanePointerCaptureAdapter, PaneShare, PaneSpec, PaneTrack, WorkspaceLayout, WorkspaceSnapshot,
};

// --- Runtime re-exports ----------------------------------------------------

pub use gtmdash_runtime::{
    DashboardConfig, DataSource, FetchDriver, FetchError, FetchState, FetchStatus,
};

pub use dashboard::{KpiViewState, MetricsWorkspace};
pub use error::{Error, Result};
pub use session::{Session, UserProfile};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DashboardConfig, Error, FetchError, FetchStatus, KpiBundle, KpiViewState, MetricsWorkspace,
        PaneId, Result, Session, UserProfile,
    };

    pub use crate::{layout, metrics, runtime};
}

pub use gtmdash_layout as layout;
pub use gtmdash_metrics as metrics;
pub use gtmdash_runtime as runtime;
