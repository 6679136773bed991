//! State benchmark: Measure aggregator and panel render cost.
//!
//! Target: snapshot of 5k finished ids well under one frame (< 2ms)

use applyboard::{DashboardConfig, Display, StateAggregator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use std::thread;

/// Aggregator with `finished` terminal ids and `active` in-flight ids.
fn populated(finished: usize, active: usize) -> StateAggregator {
    let state = StateAggregator::new();
    for i in 0..finished {
        let id = format!("aws_instance.fleet[{i}]");
        state.begin(&id, "Creating...");
        state.end(&id, i % 11 == 0);
    }
    for i in 0..active {
        state.begin(&format!("aws_eip.fleet[{i}]"), "Modifying...");
    }
    state
}

fn snapshot_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_by_size");

    for finished in [100, 1_000, 5_000] {
        let state = populated(finished, 32);
        group.bench_with_input(
            BenchmarkId::new("finished", finished),
            &state,
            |b, state| b.iter(|| black_box(state.snapshot())),
        );
    }

    group.finish();
}

fn begin_end_uncontended(c: &mut Criterion) {
    let state = StateAggregator::new();
    let ids: Vec<String> = (0..1024).map(|i| format!("null_resource.r{i}")).collect();

    c.bench_function("begin_end_1024", |b| {
        b.iter(|| {
            state.reset();
            for id in &ids {
                state.begin(black_box(id), "Creating...");
                state.end(black_box(id), false);
            }
        })
    });
}

fn begin_end_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("begin_end_contended");

    for workers in [2, 8] {
        let ids: Arc<Vec<Vec<String>>> = Arc::new(
            (0..workers)
                .map(|w| (0..256).map(|i| format!("null_resource.w{w}_{i}")).collect())
                .collect(),
        );
        group.bench_with_input(BenchmarkId::new("workers", workers), &ids, |b, ids| {
            let state = StateAggregator::new();
            b.iter(|| {
                state.reset();
                thread::scope(|scope| {
                    for chunk in ids.iter() {
                        let state = &state;
                        scope.spawn(move || {
                            for id in chunk {
                                state.begin(id, "Creating...");
                                state.end(id, false);
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

fn draw_dashboard(c: &mut Criterion) {
    let state = populated(500, 24);
    let terminal = Terminal::new(TestBackend::new(200, 50)).unwrap();
    let mut display = Display::new(terminal, &DashboardConfig::default());
    display.recalc_geometry(200, 50);

    c.bench_function("draw_200x50_snapshot", |b| {
        b.iter(|| {
            display.apply_snapshot(state.snapshot());
            display.draw()
        })
    });
}

criterion_group!(
    benches,
    snapshot_by_size,
    begin_end_uncontended,
    begin_end_contended,
    draw_dashboard,
);
criterion_main!(benches);
