extern crate criterion;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use blocked_priority_queue::BlockedPriorityQueue;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::generators::gen_random_keys;

fn filled_queue<const BLOCK_SIZE: usize>(keys: &[usize]) -> BlockedPriorityQueue<BLOCK_SIZE, usize> {
    let mut queue: BlockedPriorityQueue<BLOCK_SIZE, usize> = BlockedPriorityQueue::new();
    for &key in keys {
        queue.push(key);
    }
    queue
}

pub fn bench_reschedule_top(c: &mut Criterion) {
    let base_keys = gen_random_keys(500_000, 0);
    let fresh_keys = gen_random_keys(500, 564);

    let mut group = c.benchmark_group("reschedule_top_usize");
    for &size in &[10_000, 500_000] {
        assert!(base_keys.len() >= size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let base_queue = filled_queue::<8>(&base_keys[..size]);
            b.iter_batched(
                || base_queue.clone(),
                |mut queue| {
                    for &k in fresh_keys.iter() {
                        queue.reschedule_top(k);
                        black_box(queue.peek());
                    }
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();

    // The same churn spelled as pop-then-push on the standard heap, for a
    // baseline of what reschedule_top saves.
    let mut group = c.benchmark_group("reschedule_top_std_pop_push");
    for &size in &[10_000, 500_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let base_queue: BinaryHeap<Reverse<usize>> =
                base_keys[..size].iter().map(|&k| Reverse(k)).collect();
            b.iter_batched(
                || base_queue.clone(),
                |mut queue| {
                    for &k in fresh_keys.iter() {
                        queue.pop();
                        queue.push(Reverse(k));
                        black_box(queue.peek());
                    }
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reschedule_top);
criterion_main!(benches);
