extern crate criterion;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use blocked_priority_queue::BlockedPriorityQueue;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::generators::{gen_random_keys, gen_random_strings};

fn filled_queue<const BLOCK_SIZE: usize>(keys: &[usize]) -> BlockedPriorityQueue<BLOCK_SIZE, usize> {
    let mut queue: BlockedPriorityQueue<BLOCK_SIZE, usize> = BlockedPriorityQueue::new();
    for &key in keys {
        queue.push(key);
    }
    queue
}

pub fn bench_push(c: &mut Criterion) {
    let base_keys = gen_random_keys(500_000, 0);
    let extra = gen_random_keys(1000, 8);

    let mut group = c.benchmark_group("push_usizes_random");
    for &size in &[100_000, 200_000, 300_000, 400_000, 500_000] {
        assert!(base_keys.len() >= size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let base_queue = filled_queue::<16>(&base_keys[..size]);
            b.iter_batched(
                || base_queue.clone(),
                |mut queue| {
                    for &k in extra.iter() {
                        queue.push(k);
                    }
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();

    let mut group = c.benchmark_group("push_usizes_block_sizes");
    macro_rules! push_with_block_size {
        ($block_size:literal) => {
            group.bench_function(BenchmarkId::from_parameter($block_size), |b| {
                let base_queue = filled_queue::<$block_size>(&base_keys);
                b.iter_batched(
                    || base_queue.clone(),
                    |mut queue| {
                        for &k in extra.iter() {
                            queue.push(k);
                        }
                        queue
                    },
                    BatchSize::LargeInput,
                );
            });
        };
    }
    push_with_block_size!(4);
    push_with_block_size!(8);
    push_with_block_size!(16);
    push_with_block_size!(32);
    group.bench_function("std_binary_heap", |b| {
        let base_queue: BinaryHeap<Reverse<usize>> =
            base_keys.iter().map(|&k| Reverse(k)).collect();
        b.iter_batched(
            || base_queue.clone(),
            |mut queue| {
                for &k in extra.iter() {
                    queue.push(Reverse(k));
                }
                queue
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();

    let base_keys = gen_random_strings(50_000, 0);
    let extra = gen_random_strings(1000, 8);

    let mut group = c.benchmark_group("push_strings_random");
    for &size in &[10_000, 20_000, 30_000, 40_000, 50_000] {
        assert!(base_keys.len() >= size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut base_queue: BlockedPriorityQueue<16, String> = BlockedPriorityQueue::new();
            for key in &base_keys[..size] {
                base_queue.push(key.clone());
            }
            b.iter_batched(
                || base_queue.clone(),
                |mut queue| {
                    for k in extra.iter() {
                        queue.push(k.clone());
                    }
                    queue
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_push);
criterion_main!(benches);
