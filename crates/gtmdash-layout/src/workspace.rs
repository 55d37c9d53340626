#![forbid(unsafe_code)]

//! Multi-pane workspace layout with a persisted snapshot schema.
//!
//! A [`WorkspaceLayout`] is an ordered chain of boundaries. The first
//! boundary splits the whole container; each later boundary splits the
//! secondary region left over by the one before it. The standard dashboard
//! chain is:
//!
//! ```text
//! | sidebar | main content            | chat |
//!   ^ PaneId::SIDEBAR splits container
//!             ^ PaneId::CHAT splits the remainder
//! ```
//!
//! Boundaries are independent: dragging or collapsing one never changes
//! another's stored share.
//!
//! # Schema Versioning Policy
//!
//! Snapshots carry [`WORKSPACE_SCHEMA_VERSION`]. Unknown versions, unknown
//! pane ids, and shares outside a pane's bounds are rejected on restore.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pane::{
    PaneCancelReason, PaneCollapseOutcome, PaneDragNoopReason, PaneDragTransition, PaneId,
    PaneLayout, PaneLayoutError, PaneShare, PaneSpec, PaneTrack, ResizablePane,
};

/// Current workspace schema version.
pub const WORKSPACE_SCHEMA_VERSION: u16 = 1;

/// Persisted state of one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneSnapshot {
    pub id: PaneId,
    pub primary_share: PaneShare,
    #[serde(default)]
    pub collapsed: bool,
}

/// Persisted workspace layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default = "default_workspace_version")]
    pub schema_version: u16,
    pub panes: Vec<PaneSnapshot>,
    /// Forward-compatible extension bag.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_workspace_version() -> u16 {
    WORKSPACE_SCHEMA_VERSION
}

impl WorkspaceSnapshot {
    /// Structural checks that do not need a live layout.
    pub fn validate(&self) -> Result<(), WorkspaceError> {
        if self.schema_version != WORKSPACE_SCHEMA_VERSION {
            return Err(WorkspaceError::UnsupportedVersion {
                found: self.schema_version,
                expected: WORKSPACE_SCHEMA_VERSION,
            });
        }
        for (index, pane) in self.panes.iter().enumerate() {
            if self.panes[..index].iter().any(|prev| prev.id == pane.id) {
                return Err(WorkspaceError::DuplicatePane { pane: pane.id });
            }
        }
        Ok(())
    }
}

/// Ordered chain of resizable boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceLayout {
    panes: Vec<ResizablePane>,
}

impl WorkspaceLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sidebar and chat boundaries, in that order.
    pub fn standard(sidebar: PaneSpec, chat: PaneSpec) -> Result<Self, WorkspaceError> {
        Self::new().with_pane(sidebar)?.with_pane(chat)
    }

    pub fn with_pane(mut self, spec: PaneSpec) -> Result<Self, WorkspaceError> {
        self.add_pane(spec)?;
        Ok(self)
    }

    /// Append a boundary splitting the current trailing region.
    pub fn add_pane(&mut self, spec: PaneSpec) -> Result<(), WorkspaceError> {
        if self.pane(spec.id).is_some() {
            return Err(WorkspaceError::DuplicatePane { pane: spec.id });
        }
        let pane = ResizablePane::new(spec).map_err(|source| WorkspaceError::Pane {
            pane: spec.id,
            source,
        })?;
        self.panes.push(pane);
        Ok(())
    }

    #[must_use]
    pub fn pane(&self, id: PaneId) -> Option<&ResizablePane> {
        self.panes.iter().find(|pane| pane.id() == id)
    }

    #[must_use]
    pub fn panes(&self) -> &[ResizablePane] {
        &self.panes
    }

    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.iter().map(ResizablePane::id).collect()
    }

    fn pane_mut(&mut self, id: PaneId) -> Result<&mut ResizablePane, WorkspaceError> {
        self.panes
            .iter_mut()
            .find(|pane| pane.id() == id)
            .ok_or(WorkspaceError::UnknownPane { pane: id })
    }

    /// Share of the region `id` names.
    pub fn get_share(&self, id: PaneId) -> Result<PaneShare, WorkspaceError> {
        self.pane(id)
            .map(ResizablePane::share)
            .ok_or(WorkspaceError::UnknownPane { pane: id })
    }

    pub fn layout(&self, id: PaneId) -> Result<PaneLayout, WorkspaceError> {
        self.pane(id)
            .map(ResizablePane::layout)
            .ok_or(WorkspaceError::UnknownPane { pane: id })
    }

    pub fn is_collapsed(&self, id: PaneId) -> Result<bool, WorkspaceError> {
        self.pane(id)
            .map(ResizablePane::is_collapsed)
            .ok_or(WorkspaceError::UnknownPane { pane: id })
    }

    /// Flip collapse for one pane. Other panes are untouched.
    pub fn toggle_collapse(&mut self, id: PaneId) -> Result<PaneCollapseOutcome, WorkspaceError> {
        let pane = self.pane_mut(id)?;
        let outcome = pane
            .toggle_collapse()
            .map_err(|source| WorkspaceError::Pane { pane: id, source })?;
        tracing::debug!(
            target: "gtmdash.workspace",
            pane = id.get(),
            collapsed = outcome.collapsed,
            canceled_drag = outcome.canceled.is_some(),
            "pane collapse toggled"
        );
        Ok(outcome)
    }

    /// Track for boundary `id` given the whole container's geometry.
    #[must_use]
    pub fn track_for(&self, id: PaneId, container: PaneTrack) -> Option<PaneTrack> {
        let mut track = container;
        for pane in &self.panes {
            if pane.id() == id {
                return Some(track);
            }
            let leading = pane.effective_primary_share().of_length(track.length);
            track = PaneTrack::new(
                track.start.saturating_add(i32::try_from(leading).unwrap_or(i32::MAX)),
                track.length - leading,
            );
        }
        None
    }

    /// Pixel widths of every region, leading first. Always `panes + 1`
    /// entries (none when there are no panes) summing to `container_width`.
    #[must_use]
    pub fn pixel_widths(&self, container_width: u32) -> Vec<u32> {
        if self.panes.is_empty() {
            return Vec::new();
        }
        let mut remaining = container_width;
        let mut widths = Vec::with_capacity(self.panes.len() + 1);
        for pane in &self.panes {
            let leading = pane.effective_primary_share().of_length(remaining);
            widths.push(leading);
            remaining -= leading;
        }
        widths.push(remaining);
        widths
    }

    /// Start dragging boundary `id`. The track is derived from `container`.
    pub fn begin_drag(
        &mut self,
        id: PaneId,
        pointer_id: u32,
        container: PaneTrack,
    ) -> Result<PaneDragTransition, WorkspaceError> {
        let track = self
            .track_for(id, container)
            .ok_or(WorkspaceError::UnknownPane { pane: id })?;
        if let Some(owner) = self.dragging_with(pointer_id).map(|pane| pane.id())
            && owner != id
        {
            tracing::debug!(
                target: "gtmdash.workspace",
                pane = id.get(),
                owner = owner.get(),
                pointer_id,
                "drag refused, pointer already dragging another pane"
            );
            return Ok(self
                .pane_mut(id)?
                .reject(PaneDragNoopReason::PointerOwnedElsewhere));
        }
        Ok(self.pane_mut(id)?.begin(pointer_id, track))
    }

    /// Route a pointer move to the pane dragging with `pointer_id`.
    pub fn drag_move(&mut self, pointer_id: u32, position: i32) -> Option<PaneDragTransition> {
        self.dragging_with(pointer_id)
            .map(|pane| pane.pointer_move(pointer_id, position))
    }

    pub fn end_drag(&mut self, pointer_id: u32) -> Option<PaneDragTransition> {
        self.dragging_with(pointer_id).map(|pane| pane.end(pointer_id))
    }

    /// Cancel every active drag. Returns one transition per canceled drag.
    pub fn cancel_all(&mut self, reason: PaneCancelReason) -> Vec<PaneDragTransition> {
        self.panes
            .iter_mut()
            .filter(|pane| pane.is_dragging())
            .map(|pane| pane.cancel(reason))
            .collect()
    }

    /// Pane currently being dragged, if any.
    #[must_use]
    pub fn active_drag(&self) -> Option<PaneId> {
        self.panes
            .iter()
            .find(|pane| pane.is_dragging())
            .map(ResizablePane::id)
    }

    fn dragging_with(&mut self, pointer_id: u32) -> Option<&mut ResizablePane> {
        self.panes
            .iter_mut()
            .find(|pane| pane.active_pointer() == Some(pointer_id))
    }

    pub fn nudge(&mut self, id: PaneId, step_bps: i32) -> Result<PaneDragTransition, WorkspaceError> {
        Ok(self.pane_mut(id)?.nudge(step_bps))
    }

    pub fn reset(&mut self, id: PaneId) -> Result<PaneDragTransition, WorkspaceError> {
        Ok(self.pane_mut(id)?.reset())
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            schema_version: WORKSPACE_SCHEMA_VERSION,
            panes: self
                .panes
                .iter()
                .map(|pane| PaneSnapshot {
                    id: pane.id(),
                    primary_share: pane.layout().primary_share,
                    collapsed: pane.is_collapsed(),
                })
                .collect(),
            extensions: BTreeMap::new(),
        }
    }

    /// Apply a snapshot. Validated in full before any pane is touched, so a
    /// rejected snapshot leaves the layout unchanged. Active drags are
    /// canceled. Panes absent from the snapshot keep their state.
    pub fn restore(&mut self, snapshot: &WorkspaceSnapshot) -> Result<(), WorkspaceError> {
        snapshot.validate()?;
        for entry in &snapshot.panes {
            let pane = self
                .pane(entry.id)
                .ok_or(WorkspaceError::UnknownPane { pane: entry.id })?;
            let bounds = pane.bounds();
            if !bounds.contains(entry.primary_share) {
                return Err(WorkspaceError::Pane {
                    pane: entry.id,
                    source: PaneLayoutError::ShareOutsideBounds {
                        share: entry.primary_share,
                        min: bounds.min(),
                        max: bounds.max(),
                    },
                });
            }
            if entry.collapsed && !pane.is_collapsible() {
                return Err(WorkspaceError::Pane {
                    pane: entry.id,
                    source: PaneLayoutError::NotCollapsible { pane: entry.id },
                });
            }
        }
        for entry in &snapshot.panes {
            self.pane_mut(entry.id)?
                .apply_layout(entry.primary_share, entry.collapsed)
                .map_err(|source| WorkspaceError::Pane {
                    pane: entry.id,
                    source,
                })?;
        }
        tracing::debug!(
            target: "gtmdash.workspace",
            panes = snapshot.panes.len(),
            "workspace snapshot restored"
        );
        Ok(())
    }
}

/// Workspace-level errors.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceError {
    DuplicatePane {
        pane: PaneId,
    },
    UnknownPane {
        pane: PaneId,
    },
    UnsupportedVersion {
        found: u16,
        expected: u16,
    },
    Pane {
        pane: PaneId,
        source: PaneLayoutError,
    },
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePane { pane } => write!(f, "{pane} is declared more than once"),
            Self::UnknownPane { pane } => write!(f, "{pane} is not part of this workspace"),
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported workspace schema version {found} (expected {expected})"
            ),
            Self::Pane { pane, source } => write!(f, "{pane}: {source}"),
        }
    }
}

impl std::error::Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pane { source, .. } => Some(source),
            _ => None,
        }
    }
}
