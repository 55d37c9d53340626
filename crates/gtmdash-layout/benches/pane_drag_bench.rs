#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use gtmdash_layout::{
    PaneId, PanePointerButton, PanePointerCaptureAdapter, PanePointerCaptureConfig, PaneSpec,
    PaneTrack, WorkspaceLayout,
};
use std::hint::black_box;

fn standard_adapter() -> PanePointerCaptureAdapter {
    let layout = WorkspaceLayout::standard(PaneSpec::sidebar(), PaneSpec::chat())
        .expect("standard layout");
    PanePointerCaptureAdapter::new(layout, PanePointerCaptureConfig::default())
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pane_drag");
    let container = PaneTrack::new(0, 1_920);

    group.bench_function("down_move64_up", |b| {
        b.iter(|| {
            let mut adapter = standard_adapter();
            black_box(adapter.pointer_down(
                PaneId::CHAT,
                1,
                PanePointerButton::Primary,
                container,
                1_300,
            ));
            for step in 0..64 {
                black_box(adapter.pointer_move(1, 400 + step * 24));
            }
            black_box(adapter.pointer_up(1, PanePointerButton::Primary))
        });
    });

    let layout = WorkspaceLayout::standard(PaneSpec::sidebar(), PaneSpec::chat())
        .expect("standard layout");
    group.bench_function("pixel_widths", |b| {
        b.iter(|| black_box(layout.pixel_widths(black_box(1_920))));
    });

    group.finish();
}

criterion_group!(benches, bench_drag);
criterion_main!(benches);
