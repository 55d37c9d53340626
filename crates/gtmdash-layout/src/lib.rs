#![forbid(unsafe_code)]

//! Pane layout for the gtmdash workspace.
//!
//! - [`pane`]: one draggable boundary, its clamp bounds, and its drag machine.
//! - [`workspace`]: the ordered chain of boundaries plus persisted snapshots.
//! - [`pointer_capture`]: host pointer lifecycle adapter with one active
//!   pointer and listener bookkeeping.

pub mod pane;
pub mod pointer_capture;
pub mod workspace;

pub use pane::{
    DEFAULT_COLLAPSED_SHARE_BPS, DEFAULT_MAX_SHARE_BPS, DEFAULT_MIN_SHARE_BPS,
    DEFAULT_PRIMARY_SHARE_BPS, ListenerCommand, PaneBounds, PaneCancelReason, PaneCollapseOutcome,
    PaneDragEffect, PaneDragNoopReason, PaneDragState, PaneDragTransition, PaneId, PaneLayout,
    PaneLayoutError, PaneShare, PaneSide, PaneSpec, PaneTrack, ResizablePane, SHARE_SCALE_BPS,
    SIDEBAR_DEFAULT_SHARE_BPS, SIDEBAR_MAX_SHARE_BPS, SIDEBAR_MIN_SHARE_BPS,
};
pub use pointer_capture::{
    PanePointerButton, PanePointerCaptureAdapter, PanePointerCaptureConfig, PanePointerDispatch,
    PanePointerIgnoredReason, PanePointerLifecyclePhase, PanePointerLogEntry,
    PanePointerLogOutcome,
};
pub use workspace::{
    PaneSnapshot, WORKSPACE_SCHEMA_VERSION, WorkspaceError, WorkspaceLayout, WorkspaceSnapshot,
};
