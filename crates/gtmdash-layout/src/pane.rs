#![forbid(unsafe_code)]

//! Resizable pane boundary model and drag lifecycle machine.
//!
//! A [`ResizablePane`] is one draggable boundary between a primary (leading)
//! region and a secondary (trailing) region. Shares are stored in basis
//! points (`0..=10_000`) so the two sides always sum to exactly 100%.
//!
//! ```text
//! Idle --begin--> Dragging --end / cancel / force_cancel--> Idle
//! ```
//!
//! Every pointer move while dragging recomputes the share from the latest
//! pointer position and clamps it to the pane bounds before committing, so a
//! committed share never leaves `[min_share, max_share]`. Entering
//! `Dragging` emits [`ListenerCommand::Attach`]; leaving it emits exactly one
//! [`ListenerCommand::Detach`], whatever the exit path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Basis points in 100%.
pub const SHARE_SCALE_BPS: u16 = 10_000;

/// Default primary share (two-thirds split).
pub const DEFAULT_PRIMARY_SHARE_BPS: u16 = 6_667;

/// Default lower clamp bound (30%).
pub const DEFAULT_MIN_SHARE_BPS: u16 = 3_000;

/// Default upper clamp bound (80%).
pub const DEFAULT_MAX_SHARE_BPS: u16 = 8_000;

/// Default width reported by a collapsed region (4%).
pub const DEFAULT_COLLAPSED_SHARE_BPS: u16 = 400;

/// Default sidebar width (18%).
pub const SIDEBAR_DEFAULT_SHARE_BPS: u16 = 1_800;

/// Sidebar clamp bounds (12%-30%).
pub const SIDEBAR_MIN_SHARE_BPS: u16 = 1_200;
pub const SIDEBAR_MAX_SHARE_BPS: u16 = 3_000;

/// Stable identifier for a pane boundary. `0` is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    /// Left navigation sidebar boundary.
    pub const SIDEBAR: Self = Self(1);
    /// Main content / chat panel boundary.
    pub const CHAT: Self = Self(2);

    pub fn new(raw: u64) -> Result<Self, PaneLayoutError> {
        if raw == 0 {
            return Err(PaneLayoutError::ZeroPaneId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// Percentage of a track allocated to one side of a boundary, in basis
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneShare(u16);

impl PaneShare {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(SHARE_SCALE_BPS);

    pub fn from_bps(bps: u16) -> Result<Self, PaneLayoutError> {
        if bps > SHARE_SCALE_BPS {
            return Err(PaneLayoutError::ShareOutOfRange {
                percent: f64::from(bps) / 100.0,
            });
        }
        Ok(Self(bps))
    }

    /// Convert a percentage, rounding to the nearest basis point.
    pub fn from_percent(percent: f64) -> Result<Self, PaneLayoutError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(PaneLayoutError::ShareOutOfRange { percent });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bps = (percent * 100.0).round() as u16;
        Ok(Self(bps.min(SHARE_SCALE_BPS)))
    }

    #[must_use]
    pub const fn bps(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// The other side of the boundary: `100% - self`.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(SHARE_SCALE_BPS - self.0)
    }

    /// Pixel extent of this share of `length`, rounded to nearest.
    #[must_use]
    pub fn of_length(self, length: u32) -> u32 {
        let scaled = u64::from(length) * u64::from(self.0) + u64::from(SHARE_SCALE_BPS / 2);
        u32::try_from(scaled / u64::from(SHARE_SCALE_BPS)).unwrap_or(length)
    }
}

impl fmt::Display for PaneShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

/// Inclusive clamp bounds for the primary share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneBounds {
    min: PaneShare,
    max: PaneShare,
}

impl PaneBounds {
    pub fn new(min: PaneShare, max: PaneShare) -> Result<Self, PaneLayoutError> {
        if min > max {
            return Err(PaneLayoutError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_percent(min: f64, max: f64) -> Result<Self, PaneLayoutError> {
        Self::new(PaneShare::from_percent(min)?, PaneShare::from_percent(max)?)
    }

    #[must_use]
    pub const fn min(self) -> PaneShare {
        self.min
    }

    #[must_use]
    pub const fn max(self) -> PaneShare {
        self.max
    }

    #[must_use]
    pub fn contains(self, share: PaneShare) -> bool {
        (self.min..=self.max).contains(&share)
    }

    /// Clamp a raw (possibly negative or >100%) basis-point value.
    #[must_use]
    pub fn clamp_bps(self, raw_bps: i64) -> PaneShare {
        let clamped = raw_bps.clamp(i64::from(self.min.0), i64::from(self.max.0));
        // Within [min, max] which both fit in u16.
        PaneShare(u16::try_from(clamped).unwrap_or(self.max.0))
    }
}

impl Default for PaneBounds {
    fn default() -> Self {
        Self {
            min: PaneShare(DEFAULT_MIN_SHARE_BPS),
            max: PaneShare(DEFAULT_MAX_SHARE_BPS),
        }
    }
}

/// Which region of the boundary a pane id names, and collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneSide {
    /// Leading region (e.g. a left sidebar).
    Primary,
    /// Trailing region (e.g. a right-hand chat panel).
    #[default]
    Secondary,
}

/// Host geometry of the track a boundary moves along, measured at drag start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneTrack {
    /// Container start offset in host pixels.
    pub start: i32,
    /// Container width in host pixels.
    pub length: u32,
}

impl PaneTrack {
    #[must_use]
    pub const fn new(start: i32, length: u32) -> Self {
        Self { start, length }
    }

    /// Raw share implied by a pointer position, in basis points. Not clamped;
    /// may be negative or exceed 10 000. `None` for a zero-length track.
    #[must_use]
    pub fn raw_share_bps(self, position: i32) -> Option<i64> {
        if self.length == 0 {
            return None;
        }
        let length = i64::from(self.length);
        let offset = i64::from(position) - i64::from(self.start);
        let scaled = offset * i64::from(SHARE_SCALE_BPS);
        Some((scaled + length / 2).div_euclid(length))
    }
}

/// Construction parameters for one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSpec {
    pub id: PaneId,
    pub side: PaneSide,
    pub bounds: PaneBounds,
    pub default_share: PaneShare,
    pub collapsible: bool,
    /// Share reported by the named region while collapsed.
    pub collapsed_share: PaneShare,
}

impl PaneSpec {
    /// Spec with the stock 30%-80% bounds and a two-thirds default split.
    #[must_use]
    pub fn new(id: PaneId, side: PaneSide) -> Self {
        Self {
            id,
            side,
            bounds: PaneBounds::default(),
            default_share: PaneShare(DEFAULT_PRIMARY_SHARE_BPS),
            collapsible: true,
            collapsed_share: PaneShare(DEFAULT_COLLAPSED_SHARE_BPS),
        }
    }

    /// Left navigation sidebar: 18% default within 12%-30%.
    #[must_use]
    pub const fn sidebar() -> Self {
        Self {
            id: PaneId::SIDEBAR,
            side: PaneSide::Primary,
            bounds: PaneBounds {
                min: PaneShare(SIDEBAR_MIN_SHARE_BPS),
                max: PaneShare(SIDEBAR_MAX_SHARE_BPS),
            },
            default_share: PaneShare(SIDEBAR_DEFAULT_SHARE_BPS),
            collapsible: true,
            collapsed_share: PaneShare(DEFAULT_COLLAPSED_SHARE_BPS),
        }
    }

    /// Right-hand chat panel; the bounds apply to the main content share.
    #[must_use]
    pub const fn chat() -> Self {
        Self {
            id: PaneId::CHAT,
            side: PaneSide::Secondary,
            bounds: PaneBounds {
                min: PaneShare(DEFAULT_MIN_SHARE_BPS),
                max: PaneShare(DEFAULT_MAX_SHARE_BPS),
            },
            default_share: PaneShare(DEFAULT_PRIMARY_SHARE_BPS),
            collapsible: true,
            collapsed_share: PaneShare(DEFAULT_COLLAPSED_SHARE_BPS),
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: PaneBounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_default_share(mut self, share: PaneShare) -> Self {
        self.default_share = share;
        self
    }

    #[must_use]
    pub fn with_collapsed_share(mut self, share: PaneShare) -> Self {
        self.collapsed_share = share;
        self
    }

    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.collapsible = false;
        self
    }
}

/// Width/collapse state owned by one boundary.
///
/// `min_share <= primary_share <= max_share` always holds. Collapsing does
/// not touch `primary_share`, so expanding restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneLayout {
    pub primary_share: PaneShare,
    pub collapsed: bool,
    pub min_share: PaneShare,
    pub max_share: PaneShare,
}

/// Why an active drag was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneCancelReason {
    Blur,
    VisibilityHidden,
    PointerCancel,
    LostPointerCapture,
    PointerDownElsewhere,
    Collapsed,
    Programmatic,
}

/// Drag lifecycle state of one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneDragState {
    Idle,
    Dragging {
        pointer_id: u32,
        track: PaneTrack,
        origin_share: PaneShare,
    },
}

/// Host listener bookkeeping emitted at drag state boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerCommand {
    Attach { pane: PaneId, pointer_id: u32 },
    Detach { pane: PaneId, pointer_id: u32 },
}

/// Explicit diagnostics for events that were safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneDragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    PaneCollapsed,
    DegenerateTrack,
    DraggingDisallowsDiscreteInput,
    /// The pointer is already dragging a different pane.
    PointerOwnedElsewhere,
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneDragEffect {
    DragStarted {
        pointer_id: u32,
        share: PaneShare,
    },
    ShareCommitted {
        pointer_id: u32,
        requested_bps: i64,
        share: PaneShare,
        clamped: bool,
    },
    DragEnded {
        pointer_id: u32,
        origin_share: PaneShare,
        share: PaneShare,
    },
    Canceled {
        pointer_id: u32,
        reason: PaneCancelReason,
        share: PaneShare,
    },
    Nudged {
        share: PaneShare,
    },
    Reset {
        share: PaneShare,
    },
    Noop {
        reason: PaneDragNoopReason,
    },
}

/// One state-machine transition with its listener side effect, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneDragTransition {
    pub transition_id: u64,
    pub pane: PaneId,
    pub from: PaneDragState,
    pub to: PaneDragState,
    pub effect: PaneDragEffect,
    pub listener: Option<ListenerCommand>,
}

impl PaneDragTransition {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self.effect, PaneDragEffect::Noop { .. })
    }
}

/// Result of a collapse toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneCollapseOutcome {
    pub collapsed: bool,
    /// Drag that was canceled because the pane collapsed mid-drag.
    pub canceled: Option<PaneDragTransition>,
}

/// One draggable boundary with its own layout and drag state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizablePane {
    id: PaneId,
    side: PaneSide,
    bounds: PaneBounds,
    default_share: PaneShare,
    collapsible: bool,
    collapsed_share: PaneShare,
    primary_share: PaneShare,
    collapsed: bool,
    state: PaneDragState,
    transition_counter: u64,
}

impl ResizablePane {
    pub fn new(spec: PaneSpec) -> Result<Self, PaneLayoutError> {
        if !spec.bounds.contains(spec.default_share) {
            return Err(PaneLayoutError::ShareOutsideBounds {
                share: spec.default_share,
                min: spec.bounds.min,
                max: spec.bounds.max,
            });
        }
        Ok(Self {
            id: spec.id,
            side: spec.side,
            bounds: spec.bounds,
            default_share: spec.default_share,
            collapsible: spec.collapsible,
            collapsed_share: spec.collapsed_share,
            primary_share: spec.default_share,
            collapsed: false,
            state: PaneDragState::Idle,
            transition_counter: 0,
        })
    }

    #[must_use]
    pub const fn id(&self) -> PaneId {
        self.id
    }

    #[must_use]
    pub const fn side(&self) -> PaneSide {
        self.side
    }

    #[must_use]
    pub const fn bounds(&self) -> PaneBounds {
        self.bounds
    }

    #[must_use]
    pub const fn state(&self) -> PaneDragState {
        self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, PaneDragState::Dragging { .. })
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    #[must_use]
    pub const fn is_collapsible(&self) -> bool {
        self.collapsible
    }

    /// Pointer currently driving the drag, if any.
    #[must_use]
    pub const fn active_pointer(&self) -> Option<u32> {
        match self.state {
            PaneDragState::Idle => None,
            PaneDragState::Dragging { pointer_id, .. } => Some(pointer_id),
        }
    }

    #[must_use]
    pub const fn layout(&self) -> PaneLayout {
        PaneLayout {
            primary_share: self.primary_share,
            collapsed: self.collapsed,
            min_share: self.bounds.min,
            max_share: self.bounds.max,
        }
    }

    /// Share of the leading region after collapse is applied.
    #[must_use]
    pub const fn effective_primary_share(&self) -> PaneShare {
        match (self.collapsed, self.side) {
            (false, _) => self.primary_share,
            (true, PaneSide::Primary) => self.collapsed_share,
            (true, PaneSide::Secondary) => self.collapsed_share.complement(),
        }
    }

    #[must_use]
    pub const fn effective_secondary_share(&self) -> PaneShare {
        self.effective_primary_share().complement()
    }

    /// Share of the region this pane id names.
    #[must_use]
    pub const fn share(&self) -> PaneShare {
        match self.side {
            PaneSide::Primary => self.effective_primary_share(),
            PaneSide::Secondary => self.effective_secondary_share(),
        }
    }

    /// Enter `Dragging` for `pointer_id` over `track`.
    pub fn begin(&mut self, pointer_id: u32, track: PaneTrack) -> PaneDragTransition {
        let from = self.state;
        let effect = match self.state {
            PaneDragState::Dragging { .. } => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::ActiveDragAlreadyInProgress,
            },
            PaneDragState::Idle if self.collapsed => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::PaneCollapsed,
            },
            PaneDragState::Idle if track.length == 0 => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::DegenerateTrack,
            },
            PaneDragState::Idle => {
                self.state = PaneDragState::Dragging {
                    pointer_id,
                    track,
                    origin_share: self.primary_share,
                };
                PaneDragEffect::DragStarted {
                    pointer_id,
                    share: self.primary_share,
                }
            }
        };
        self.record(from, effect)
    }

    /// Recompute and commit the clamped share for the latest pointer position.
    pub fn pointer_move(&mut self, pointer_id: u32, position: i32) -> PaneDragTransition {
        let from = self.state;
        let effect = match self.state {
            PaneDragState::Idle => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::IdleWithoutActiveDrag,
            },
            PaneDragState::Dragging {
                pointer_id: active, ..
            } if active != pointer_id => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::PointerMismatch,
            },
            PaneDragState::Dragging { track, .. } => match track.raw_share_bps(position) {
                None => PaneDragEffect::Noop {
                    reason: PaneDragNoopReason::DegenerateTrack,
                },
                Some(requested_bps) => {
                    let share = self.bounds.clamp_bps(requested_bps);
                    self.primary_share = share;
                    PaneDragEffect::ShareCommitted {
                        pointer_id,
                        requested_bps,
                        share,
                        clamped: i64::from(share.bps()) != requested_bps,
                    }
                }
            },
        };
        self.record(from, effect)
    }

    /// Pointer released: keep the last committed share and return to idle.
    pub fn end(&mut self, pointer_id: u32) -> PaneDragTransition {
        let from = self.state;
        let effect = match self.state {
            PaneDragState::Idle => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::IdleWithoutActiveDrag,
            },
            PaneDragState::Dragging {
                pointer_id: active, ..
            } if active != pointer_id => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::PointerMismatch,
            },
            PaneDragState::Dragging { origin_share, .. } => {
                self.state = PaneDragState::Idle;
                PaneDragEffect::DragEnded {
                    pointer_id,
                    origin_share,
                    share: self.primary_share,
                }
            }
        };
        self.record(from, effect)
    }

    /// Abandon the active drag regardless of pointer. Committed share stays.
    pub fn cancel(&mut self, reason: PaneCancelReason) -> PaneDragTransition {
        let from = self.state;
        let effect = match self.state {
            PaneDragState::Idle => PaneDragEffect::Noop {
                reason: PaneDragNoopReason::IdleWithoutActiveDrag,
            },
            PaneDragState::Dragging { pointer_id, .. } => {
                self.state = PaneDragState::Idle;
                PaneDragEffect::Canceled {
                    pointer_id,
                    reason,
                    share: self.primary_share,
                }
            }
        };
        self.record(from, effect)
    }

    /// Reset to idle for teardown paths. `None` if already idle.
    pub fn force_cancel(&mut self) -> Option<PaneDragTransition> {
        self.is_dragging()
            .then(|| self.cancel(PaneCancelReason::Programmatic))
    }

    /// Keyboard nudge of the primary share by `step_bps`, clamped.
    pub fn nudge(&mut self, step_bps: i32) -> PaneDragTransition {
        let from = self.state;
        let effect = if self.is_dragging() {
            PaneDragEffect::Noop {
                reason: PaneDragNoopReason::DraggingDisallowsDiscreteInput,
            }
        } else if self.collapsed {
            PaneDragEffect::Noop {
                reason: PaneDragNoopReason::PaneCollapsed,
            }
        } else {
            let share = self
                .bounds
                .clamp_bps(i64::from(self.primary_share.bps()) + i64::from(step_bps));
            self.primary_share = share;
            PaneDragEffect::Nudged { share }
        };
        self.record(from, effect)
    }

    /// Restore the default share. Ignored while dragging.
    pub fn reset(&mut self) -> PaneDragTransition {
        let from = self.state;
        let effect = if self.is_dragging() {
            PaneDragEffect::Noop {
                reason: PaneDragNoopReason::DraggingDisallowsDiscreteInput,
            }
        } else {
            self.primary_share = self.default_share;
            PaneDragEffect::Reset {
                share: self.primary_share,
            }
        };
        self.record(from, effect)
    }

    /// Flip the collapsed flag. A drag in progress is canceled first.
    pub fn toggle_collapse(&mut self) -> Result<PaneCollapseOutcome, PaneLayoutError> {
        if !self.collapsible {
            return Err(PaneLayoutError::NotCollapsible { pane: self.id });
        }
        let canceled = self
            .is_dragging()
            .then(|| self.cancel(PaneCancelReason::Collapsed));
        self.collapsed = !self.collapsed;
        Ok(PaneCollapseOutcome {
            collapsed: self.collapsed,
            canceled,
        })
    }

    /// Apply a stored layout. Rejects shares outside this pane's bounds.
    pub fn apply_layout(
        &mut self,
        primary_share: PaneShare,
        collapsed: bool,
    ) -> Result<Option<PaneDragTransition>, PaneLayoutError> {
        if !self.bounds.contains(primary_share) {
            return Err(PaneLayoutError::ShareOutsideBounds {
                share: primary_share,
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        if collapsed && !self.collapsible {
            return Err(PaneLayoutError::NotCollapsible { pane: self.id });
        }
        let canceled = self.force_cancel();
        self.primary_share = primary_share;
        self.collapsed = collapsed;
        Ok(canceled)
    }

    /// Record a no-op decided by the owner of this pane.
    pub(crate) fn reject(&mut self, reason: PaneDragNoopReason) -> PaneDragTransition {
        let from = self.state;
        self.record(from, PaneDragEffect::Noop { reason })
    }

    fn record(&mut self, from: PaneDragState, effect: PaneDragEffect) -> PaneDragTransition {
        let listener = match (from, self.state) {
            (PaneDragState::Idle, PaneDragState::Dragging { pointer_id, .. }) => {
                Some(ListenerCommand::Attach {
                    pane: self.id,
                    pointer_id,
                })
            }
            (PaneDragState::Dragging { pointer_id, .. }, PaneDragState::Idle) => {
                Some(ListenerCommand::Detach {
                    pane: self.id,
                    pointer_id,
                })
            }
            _ => None,
        };
        self.transition_counter = self.transition_counter.saturating_add(1);
        if let Some(command) = listener {
            tracing::debug!(
                target: "gtmdash.pane",
                pane = self.id.get(),
                command = ?command,
                share_bps = self.primary_share.bps(),
                "pane listener transition"
            );
        }
        PaneDragTransition {
            transition_id: self.transition_counter,
            pane: self.id,
            from,
            to: self.state,
            effect,
            listener,
        }
    }
}

/// Pane construction and state errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneLayoutError {
    ZeroPaneId,
    ShareOutOfRange {
        percent: f64,
    },
    InvalidBounds {
        min: PaneShare,
        max: PaneShare,
    },
    ShareOutsideBounds {
        share: PaneShare,
        min: PaneShare,
        max: PaneShare,
    },
    NotCollapsible {
        pane: PaneId,
    },
}

impl fmt::Display for PaneLayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPaneId => write!(f, "pane id 0 is reserved"),
            Self::ShareOutOfRange { percent } => {
                write!(f, "share {percent}% is outside 0%..=100%")
            }
            Self::InvalidBounds { min, max } => {
                write!(f, "min share {min} exceeds max share {max}")
            }
            Self::ShareOutsideBounds { share, min, max } => {
                write!(f, "share {share} is outside bounds [{min}, {max}]")
            }
            Self::NotCollapsible { pane } => write!(f, "{pane} is not collapsible"),
        }
    }
}

impl std::error::Error for PaneLayoutError {}
