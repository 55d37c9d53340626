//! Property/fuzz-style invariants for workspace pane interaction streams.
//!
//! Random pointer, focus, keyboard, and collapse streams are replayed
//! against the pointer adapter and the layout is checked after every step:
//!
//! 1. Every stored primary share stays within its pane's bounds.
//! 2. Region pixel widths always sum to the container width.
//! 3. Listener commands balance: attaches minus detaches is 1 while a pointer
//!    is active and 0 otherwise.
//! 4. Moves with no active drag never change any share.
//! 5. Collapsing twice restores the exact pre-toggle share.

use gtmdash_layout::{
    ListenerCommand, PaneId, PanePointerButton, PanePointerCaptureAdapter,
    PanePointerCaptureConfig, PanePointerDispatch, PaneSpec, PaneTrack, WorkspaceLayout,
};
use proptest::prelude::*;

const PANES: [PaneId; 2] = [PaneId::SIDEBAR, PaneId::CHAT];

#[derive(Debug, Clone)]
enum Op {
    Down { pane: usize, pointer: u32 },
    Move { pointer: u32, position: i32 },
    Up { pointer: u32 },
    Leave { pointer: u32 },
    Cancel,
    Blur,
    Hidden,
    Elsewhere { pointer: u32 },
    Toggle { pane: usize },
    Nudge { pane: usize, step: i32 },
    Reset { pane: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..2, 1u32..4).prop_map(|(pane, pointer)| Op::Down { pane, pointer }),
        6 => (1u32..4, -200i32..1_400).prop_map(|(pointer, position)| Op::Move { pointer, position }),
        2 => (1u32..4).prop_map(|pointer| Op::Up { pointer }),
        1 => (1u32..4).prop_map(|pointer| Op::Leave { pointer }),
        1 => Just(Op::Cancel),
        1 => Just(Op::Blur),
        1 => Just(Op::Hidden),
        1 => (1u32..4).prop_map(|pointer| Op::Elsewhere { pointer }),
        1 => (0usize..2).prop_map(|pane| Op::Toggle { pane }),
        1 => (0usize..2, -3_000i32..3_000).prop_map(|(pane, step)| Op::Nudge { pane, step }),
        1 => (0usize..2).prop_map(|pane| Op::Reset { pane }),
    ]
}

fn fresh_adapter() -> PanePointerCaptureAdapter {
    let layout = WorkspaceLayout::standard(PaneSpec::sidebar(), PaneSpec::chat())
        .expect("standard layout");
    PanePointerCaptureAdapter::new(layout, PanePointerCaptureConfig::default())
}

fn apply(
    adapter: &mut PanePointerCaptureAdapter,
    op: &Op,
    container: PaneTrack,
) -> Vec<ListenerCommand> {
    let single = |dispatch: PanePointerDispatch| -> Vec<ListenerCommand> {
        dispatch.listener().into_iter().collect()
    };
    match *op {
        Op::Down { pane, pointer } => single(adapter.pointer_down(
            PANES[pane],
            pointer,
            PanePointerButton::Primary,
            container,
            0,
        )),
        Op::Move { pointer, position } => single(adapter.pointer_move(pointer, position)),
        Op::Up { pointer } => single(adapter.pointer_up(pointer, PanePointerButton::Primary)),
        Op::Leave { pointer } => single(adapter.pointer_leave(pointer)),
        Op::Cancel => single(adapter.pointer_cancel(None)),
        Op::Blur => single(adapter.blur()),
        Op::Hidden => single(adapter.visibility_hidden()),
        Op::Elsewhere { pointer } => single(adapter.pointer_down_elsewhere(pointer)),
        Op::Toggle { pane } => {
            let (_, dispatch) = adapter
                .toggle_collapse(PANES[pane])
                .expect("standard panes are collapsible");
            dispatch.and_then(|d| d.listener()).into_iter().collect()
        }
        Op::Nudge { pane, step } => adapter
            .nudge(PANES[pane], step)
            .expect("known pane")
            .listener
            .into_iter()
            .collect(),
        Op::Reset { pane } => adapter
            .reset(PANES[pane])
            .expect("known pane")
            .listener
            .into_iter()
            .collect(),
    }
}

fn primary_shares(adapter: &PanePointerCaptureAdapter) -> Vec<u16> {
    adapter
        .layout()
        .panes()
        .iter()
        .map(|pane| pane.layout().primary_share.bps())
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Stream invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn interaction_streams_preserve_layout_invariants(
        ops in prop::collection::vec(op_strategy(), 1..80),
        width in 0u32..4_000,
    ) {
        let container = PaneTrack::new(0, width);
        let mut adapter = fresh_adapter();
        let mut balance: i64 = 0;

        for op in &ops {
            let idle_before = adapter.active_pointer_id().is_none();
            let shares_before = primary_shares(&adapter);

            for command in apply(&mut adapter, op, container) {
                match command {
                    ListenerCommand::Attach { .. } => balance += 1,
                    ListenerCommand::Detach { .. } => balance -= 1,
                }
            }

            for pane in adapter.layout().panes() {
                let layout = pane.layout();
                prop_assert!(layout.min_share <= layout.primary_share);
                prop_assert!(layout.primary_share <= layout.max_share);
            }

            let widths = adapter.layout().pixel_widths(width);
            prop_assert_eq!(widths.len(), PANES.len() + 1);
            prop_assert_eq!(widths.iter().map(|w| u64::from(*w)).sum::<u64>(), u64::from(width));

            let expected_balance = i64::from(adapter.active_pointer_id().is_some());
            prop_assert_eq!(balance, expected_balance, "listener imbalance after {:?}", op);

            if idle_before && matches!(op, Op::Move { .. }) {
                prop_assert_eq!(primary_shares(&adapter), shares_before);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Collapse round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn double_toggle_restores_share(
        pane in 0usize..2,
        drag_to in -500i32..2_000,
        mid_drag in any::<bool>(),
    ) {
        let container = PaneTrack::new(0, 1_000);
        let mut adapter = fresh_adapter();
        adapter.pointer_down(PANES[pane], 1, PanePointerButton::Primary, container, 0);
        adapter.pointer_move(1, drag_to);
        if !mid_drag {
            adapter.pointer_up(1, PanePointerButton::Primary);
        }
        let before = adapter.layout().get_share(PANES[pane]).expect("known pane");
        let other = adapter.layout().get_share(PANES[1 - pane]).expect("known pane");

        adapter.toggle_collapse(PANES[pane]).expect("collapsible");
        prop_assert_eq!(adapter.active_pointer_id(), None);
        adapter.toggle_collapse(PANES[pane]).expect("collapsible");

        prop_assert_eq!(adapter.layout().get_share(PANES[pane]).expect("known pane"), before);
        prop_assert_eq!(adapter.layout().get_share(PANES[1 - pane]).expect("known pane"), other);
    }
}
