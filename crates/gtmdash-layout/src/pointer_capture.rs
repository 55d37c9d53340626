#![forbid(unsafe_code)]

//! Deterministic pointer lifecycle adapter for workspace pane resizing.
//!
//! This module bridges host pointer signals into [`WorkspaceLayout`] drag
//! calls while enforcing:
//! - one active pointer at a time across the whole workspace,
//! - explicit listener attach/detach commands for the host, and
//! - cancellation on interruption paths (blur, visibility, lost capture,
//!   pointer-down elsewhere).
//!
//! Every dispatch returns a [`PanePointerLogEntry`] describing what happened,
//! including ignored signals and why they were ignored.

use crate::pane::{
    ListenerCommand, PaneCancelReason, PaneCollapseOutcome, PaneDragState, PaneDragTransition,
    PaneId, PaneTrack,
};
use crate::workspace::{WorkspaceError, WorkspaceLayout, WorkspaceSnapshot};

/// Host pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanePointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanePointerCaptureConfig {
    /// Button required to begin a drag sequence.
    pub activation_button: PanePointerButton,
    /// If true, pointer leave ends the drag like pointer-up. Otherwise it is
    /// ignored and the host keeps tracking.
    pub end_on_leave: bool,
}

impl Default for PanePointerCaptureConfig {
    fn default() -> Self {
        Self {
            activation_button: PanePointerButton::Primary,
            end_on_leave: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePointer {
    pointer_id: u32,
    pane: PaneId,
    button: PanePointerButton,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePointerLifecyclePhase {
    PointerDown,
    PointerDownElsewhere,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    Blur,
    VisibilityHidden,
    LostPointerCapture,
    Collapse,
    Restore,
}

/// Reason an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePointerIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ButtonMismatch,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    UnknownPane,
    LeaveWhileTracking,
    PaneRejectedEvent,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePointerLogOutcome {
    Forwarded,
    Ignored(PanePointerIgnoredReason),
}

/// Structured lifecycle record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanePointerLogEntry {
    pub phase: PanePointerLifecyclePhase,
    /// Assigned only to forwarded dispatches, strictly increasing.
    pub sequence: Option<u64>,
    pub pointer_id: Option<u32>,
    pub pane: Option<PaneId>,
    pub position: Option<i32>,
    pub listener: Option<ListenerCommand>,
    pub outcome: PanePointerLogOutcome,
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanePointerDispatch {
    pub transition: Option<PaneDragTransition>,
    pub log: PanePointerLogEntry,
}

impl PanePointerDispatch {
    /// Listener command the host must apply, if any.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerCommand> {
        self.log.listener
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, PanePointerLogOutcome::Ignored(_))
    }

    fn ignored(
        context: DispatchContext,
        reason: PanePointerIgnoredReason,
        transition: Option<PaneDragTransition>,
    ) -> Self {
        Self {
            transition,
            log: PanePointerLogEntry {
                phase: context.phase,
                sequence: None,
                pointer_id: context.pointer_id,
                pane: context.pane,
                position: context.position,
                listener: None,
                outcome: PanePointerLogOutcome::Ignored(reason),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DispatchContext {
    phase: PanePointerLifecyclePhase,
    pointer_id: Option<u32>,
    pane: Option<PaneId>,
    position: Option<i32>,
}

impl DispatchContext {
    const fn new(phase: PanePointerLifecyclePhase) -> Self {
        Self {
            phase,
            pointer_id: None,
            pane: None,
            position: None,
        }
    }

    const fn pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = Some(pointer_id);
        self
    }

    const fn pane(mut self, pane: PaneId) -> Self {
        self.pane = Some(pane);
        self
    }

    const fn position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Pointer lifecycle adapter owning a [`WorkspaceLayout`].
///
/// All drag-affecting mutation goes through the adapter, so the active
/// pointer it tracks is always the one the dragging pane holds.
#[derive(Debug, Clone)]
pub struct PanePointerCaptureAdapter {
    layout: WorkspaceLayout,
    config: PanePointerCaptureConfig,
    active: Option<ActivePointer>,
    next_sequence: u64,
}

impl PanePointerCaptureAdapter {
    #[must_use]
    pub fn new(layout: WorkspaceLayout, config: PanePointerCaptureConfig) -> Self {
        Self {
            layout,
            config,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn config(&self) -> PanePointerCaptureConfig {
        self.config
    }

    #[must_use]
    pub const fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    #[must_use]
    pub fn active_pane(&self) -> Option<PaneId> {
        self.active.map(|active| active.pane)
    }

    /// Pointer-down on the boundary of `pane`. `container` is the whole
    /// workspace geometry measured at this moment.
    pub fn pointer_down(
        &mut self,
        pane: PaneId,
        pointer_id: u32,
        button: PanePointerButton,
        container: PaneTrack,
        position: i32,
    ) -> PanePointerDispatch {
        let context = DispatchContext::new(PanePointerLifecyclePhase::PointerDown)
            .pointer(pointer_id)
            .pane(pane)
            .position(position);
        if pointer_id == 0 {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::InvalidPointerId,
                None,
            );
        }
        if button != self.config.activation_button {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::ButtonNotAllowed,
                None,
            );
        }
        if self.active.is_some() {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::ActivePointerAlreadyInProgress,
                None,
            );
        }
        let Ok(transition) = self.layout.begin_drag(pane, pointer_id, container) else {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::UnknownPane,
                None,
            );
        };
        let dispatch = self.forward(context, transition);
        if !dispatch.is_ignored() {
            self.active = Some(ActivePointer {
                pointer_id,
                pane,
                button,
            });
        }
        dispatch
    }

    /// Pointer-down anywhere other than the active boundary. Recovers from a
    /// pointer-up the host never delivered.
    pub fn pointer_down_elsewhere(&mut self, pointer_id: u32) -> PanePointerDispatch {
        let context =
            DispatchContext::new(PanePointerLifecyclePhase::PointerDownElsewhere).pointer(pointer_id);
        self.cancel_active(context, PaneCancelReason::PointerDownElsewhere)
    }

    pub fn pointer_move(&mut self, pointer_id: u32, position: i32) -> PanePointerDispatch {
        let context = DispatchContext::new(PanePointerLifecyclePhase::PointerMove)
            .pointer(pointer_id)
            .position(position);
        let active = match self.require_active(context, pointer_id) {
            Ok(active) => active,
            Err(dispatch) => return dispatch,
        };
        match self.layout.drag_move(pointer_id, position) {
            Some(transition) => self.forward(context.pane(active.pane), transition),
            None => PanePointerDispatch::ignored(
                context.pane(active.pane),
                PanePointerIgnoredReason::PaneRejectedEvent,
                None,
            ),
        }
    }

    pub fn pointer_up(&mut self, pointer_id: u32, button: PanePointerButton) -> PanePointerDispatch {
        let context = DispatchContext::new(PanePointerLifecyclePhase::PointerUp).pointer(pointer_id);
        let active = match self.require_active(context, pointer_id) {
            Ok(active) => active,
            Err(dispatch) => return dispatch,
        };
        if active.button != button {
            return PanePointerDispatch::ignored(
                context.pane(active.pane),
                PanePointerIgnoredReason::ButtonMismatch,
                None,
            );
        }
        self.end_active(context.pane(active.pane), pointer_id)
    }

    /// Host pointer-cancel. `None` cancels whichever pointer is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> PanePointerDispatch {
        let mut context = DispatchContext::new(PanePointerLifecyclePhase::PointerCancel);
        context.pointer_id = pointer_id;
        if let (Some(pointer_id), Some(active)) = (pointer_id, self.active)
            && active.pointer_id != pointer_id
        {
            return PanePointerDispatch::ignored(
                context.pane(active.pane),
                PanePointerIgnoredReason::PointerMismatch,
                None,
            );
        }
        self.cancel_active(context, PaneCancelReason::PointerCancel)
    }

    /// Pointer left the tracked area.
    pub fn pointer_leave(&mut self, pointer_id: u32) -> PanePointerDispatch {
        let context =
            DispatchContext::new(PanePointerLifecyclePhase::PointerLeave).pointer(pointer_id);
        let active = match self.require_active(context, pointer_id) {
            Ok(active) => active,
            Err(dispatch) => return dispatch,
        };
        if !self.config.end_on_leave {
            return PanePointerDispatch::ignored(
                context.pane(active.pane),
                PanePointerIgnoredReason::LeaveWhileTracking,
                None,
            );
        }
        self.end_active(context.pane(active.pane), pointer_id)
    }

    pub fn blur(&mut self) -> PanePointerDispatch {
        self.cancel_active(
            DispatchContext::new(PanePointerLifecyclePhase::Blur),
            PaneCancelReason::Blur,
        )
    }

    pub fn visibility_hidden(&mut self) -> PanePointerDispatch {
        self.cancel_active(
            DispatchContext::new(PanePointerLifecyclePhase::VisibilityHidden),
            PaneCancelReason::VisibilityHidden,
        )
    }

    pub fn lost_pointer_capture(&mut self, pointer_id: u32) -> PanePointerDispatch {
        let context =
            DispatchContext::new(PanePointerLifecyclePhase::LostPointerCapture).pointer(pointer_id);
        if let Err(dispatch) = self.require_active(context, pointer_id) {
            return dispatch;
        }
        self.cancel_active(context, PaneCancelReason::LostPointerCapture)
    }

    /// Toggle collapse on `pane`, canceling its drag first if it is active.
    pub fn toggle_collapse(
        &mut self,
        pane: PaneId,
    ) -> Result<(PaneCollapseOutcome, Option<PanePointerDispatch>), WorkspaceError> {
        let outcome = self.layout.toggle_collapse(pane)?;
        let dispatch = outcome.canceled.map(|transition| {
            self.forward(
                DispatchContext::new(PanePointerLifecyclePhase::Collapse).pane(pane),
                transition,
            )
        });
        Ok((outcome, dispatch))
    }

    /// Restore a snapshot. Any drag in progress is canceled.
    pub fn restore(
        &mut self,
        snapshot: &WorkspaceSnapshot,
    ) -> Result<Option<PanePointerDispatch>, WorkspaceError> {
        let canceled = self.cancel_active(
            DispatchContext::new(PanePointerLifecyclePhase::Restore),
            PaneCancelReason::Programmatic,
        );
        self.layout.restore(snapshot)?;
        Ok((!canceled.is_ignored()).then_some(canceled))
    }

    /// Keyboard nudge on an idle pane.
    pub fn nudge(&mut self, pane: PaneId, step_bps: i32) -> Result<PaneDragTransition, WorkspaceError> {
        self.layout.nudge(pane, step_bps)
    }

    pub fn reset(&mut self, pane: PaneId) -> Result<PaneDragTransition, WorkspaceError> {
        self.layout.reset(pane)
    }

    fn require_active(
        &self,
        context: DispatchContext,
        pointer_id: u32,
    ) -> Result<ActivePointer, PanePointerDispatch> {
        let Some(active) = self.active else {
            return Err(PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::NoActivePointer,
                None,
            ));
        };
        if active.pointer_id != pointer_id {
            return Err(PanePointerDispatch::ignored(
                context.pane(active.pane),
                PanePointerIgnoredReason::PointerMismatch,
                None,
            ));
        }
        Ok(active)
    }

    fn end_active(&mut self, context: DispatchContext, pointer_id: u32) -> PanePointerDispatch {
        match self.layout.end_drag(pointer_id) {
            Some(transition) => self.forward(context, transition),
            None => PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::PaneRejectedEvent,
                None,
            ),
        }
    }

    fn cancel_active(
        &mut self,
        context: DispatchContext,
        reason: PaneCancelReason,
    ) -> PanePointerDispatch {
        let Some(active) = self.active else {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::NoActivePointer,
                None,
            );
        };
        let context = DispatchContext {
            pointer_id: Some(active.pointer_id),
            pane: Some(active.pane),
            ..context
        };
        match self.layout.cancel_all(reason).into_iter().next() {
            Some(transition) => self.forward(context, transition),
            None => {
                self.active = None;
                PanePointerDispatch::ignored(
                    context,
                    PanePointerIgnoredReason::PaneRejectedEvent,
                    None,
                )
            }
        }
    }

    fn forward(
        &mut self,
        context: DispatchContext,
        transition: PaneDragTransition,
    ) -> PanePointerDispatch {
        if transition.is_noop() {
            return PanePointerDispatch::ignored(
                context,
                PanePointerIgnoredReason::PaneRejectedEvent,
                Some(transition),
            );
        }
        if transition.to == PaneDragState::Idle {
            self.active = None;
        }
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        tracing::trace!(
            target: "gtmdash.pane",
            sequence,
            phase = ?context.phase,
            pane = transition.pane.get(),
            effect = ?transition.effect,
            "pointer dispatch forwarded"
        );
        PanePointerDispatch {
            transition: Some(transition),
            log: PanePointerLogEntry {
                phase: context.phase,
                sequence: Some(sequence),
                pointer_id: context.pointer_id,
                pane: context.pane,
                position: context.position,
                listener: transition.listener,
                outcome: PanePointerLogOutcome::Forwarded,
            },
        }
    }
}
