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

pub fn bench_pop(c: &mut Criterion) {
    let base_keys = gen_random_keys(500_000, 0);

    let mut group = c.benchmark_group("pop_usizes_random");
    for &size in &[100_000, 200_000, 300_000, 400_000, 500_000] {
        assert!(base_keys.len() >= size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let base_queue = filled_queue::<16>(&base_keys[..size]);
            b.iter_batched(
                || base_queue.clone(),
                |mut queue| {
                    for _ in 0..1000 {
                        black_box(queue.pop());
                    }
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();

    let mut group = c.benchmark_group("pop_usizes_block_sizes");
    macro_rules! pop_with_block_size {
        ($block_size:literal) => {
            group.bench_function(BenchmarkId::from_parameter($block_size), |b| {
                let base_queue = filled_queue::<$block_size>(&base_keys);
                b.iter_batched(
                    || base_queue.clone(),
                    |mut queue| {
                        for _ in 0..1000 {
                            black_box(queue.pop());
                        }
                        queue
                    },
                    BatchSize::LargeInput,
                );
            });
        };
    }
    pop_with_block_size!(4);
    pop_with_block_size!(8);
    pop_with_block_size!(16);
    pop_with_block_size!(32);
    group.bench_function("std_binary_heap", |b| {
        let base_queue: BinaryHeap<Reverse<usize>> =
            base_keys.iter().map(|&k| Reverse(k)).collect();
        b.iter_batched(
            || base_queue.clone(),
            |mut queue| {
                for _ in 0..1000 {
                    black_box(queue.pop());
                }
                queue
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_pop);
criterion_main!(benches);
